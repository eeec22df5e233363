//! Address Candidate Scanner
//!
//! Finds base58 runs in free-form chat text that plausibly are Solana
//! contract addresses and returns a ranked shortlist.
//!
//! Pipeline per call:
//! 1. run the extraction patterns (strict, loose, suffix, anchored)
//! 2. drop matches the validator rejects
//! 3. score each surviving observation (priority, context, entropy, length)
//! 4. keep the best observation per address
//! 5. sort by score descending and truncate
//!
//! Scanning never fails. A candidate whose scoring errors is logged and
//! dropped; the rest of the scan carries on.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::core::clues::ContextClueExtractor;
use crate::core::patterns::{ExtractionPatterns, RawMatch};
use crate::core::scoring::{self, ContextScorer};
use crate::core::validator::AddressValidator;
use crate::models::config::ScannerConfig;
use crate::models::errors::AppResult;
use crate::models::types::{AddressCandidate, Classification, ScoreBreakdown};
use crate::telemetry::ScanTelemetry;
use crate::utils::cache::{Clock, SystemClock};

/// Best observation of one address
#[derive(Debug, Clone)]
struct Observation {
    address: String,
    score: f64,
    breakdown: ScoreBreakdown,
    start: usize,
    end: usize,
}

pub struct AddressCandidateScanner {
    config: ScannerConfig,
    patterns: ExtractionPatterns,
    scorer: ContextScorer,
    clues: ContextClueExtractor,
    validator: AddressValidator,
    telemetry: Option<Arc<ScanTelemetry>>,
}

impl AddressCandidateScanner {
    pub fn new(config: ScannerConfig) -> AppResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Scanner whose validation cache reads time from `clock`
    pub fn with_clock(config: ScannerConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            patterns: ExtractionPatterns::new(&config.priorities)?,
            scorer: ContextScorer::new()?,
            clues: ContextClueExtractor::new()?,
            validator: AddressValidator::with_clock(config.clone(), clock),
            config,
            telemetry: None,
        })
    }

    pub fn with_telemetry(mut self, telemetry: Arc<ScanTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn validator(&self) -> &AddressValidator {
        &self.validator
    }

    /// Ranked, deduplicated candidates, at most `max_results` long
    pub fn scan(&self, text: &str, max_results: usize) -> Vec<AddressCandidate> {
        let started = Instant::now();
        let candidates = self.scan_inner(text, max_results);

        if let Some(telemetry) = &self.telemetry {
            telemetry.record_scan(&candidates, started.elapsed());
        }
        candidates
    }

    /// `scan` with the configured default result count
    pub fn scan_default(&self, text: &str) -> Vec<AddressCandidate> {
        self.scan(text, self.config.default_max_results)
    }

    /// Presumptive contract address of a message
    pub fn best_candidate(&self, text: &str) -> Option<AddressCandidate> {
        self.scan(text, 1).into_iter().next()
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        self.validator.is_valid_address(address)
    }

    pub fn classify(&self, address: &str) -> Classification {
        self.validator.classify(address)
    }

    /// Never performs a lookup; returns the cached heuristic classification
    pub fn validate_on_chain(&self, address: &str) -> Classification {
        self.validator.validate_on_chain(address)
    }

    fn scan_inner(&self, text: &str, max_results: usize) -> Vec<AddressCandidate> {
        if max_results == 0 || text.is_empty() {
            return Vec::new();
        }

        // first-seen order breaks score ties deterministically
        let mut order: Vec<Observation> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for raw in self.patterns.find_all(text) {
            let Some(observation) = self.observe(text, &raw) else {
                continue;
            };

            match index.get(&observation.address) {
                Some(&i) => {
                    if observation.score > order[i].score {
                        order[i] = observation;
                    }
                }
                None => {
                    index.insert(observation.address.clone(), order.len());
                    order.push(observation);
                }
            }
        }

        order.sort_by(|a, b| b.score.total_cmp(&a.score));
        order.truncate(max_results);

        order
            .into_iter()
            .map(|observation| self.into_candidate(text, observation))
            .collect()
    }

    /// Validate and score one pattern hit
    fn observe(&self, text: &str, raw: &RawMatch) -> Option<Observation> {
        let address = text.get(raw.start..raw.end)?;
        if !self.validator.is_valid_address(address) {
            return None;
        }

        let context = match self.scorer.score(text, raw.start, raw.end, &self.config) {
            Ok(context) => context,
            Err(e) if e.code.is_candidate_local() => {
                warn!(address, code = e.code_str(), "candidate discarded: {}", e);
                return None;
            }
            Err(e) => {
                error!(address, code = e.code_str(), "unexpected scoring failure, candidate discarded: {}", e);
                return None;
            }
        };

        let breakdown = scoring::breakdown(address, raw.pattern, raw.priority, context);
        let score = scoring::composite(&breakdown, &self.config);
        debug!(
            address,
            pattern = raw.pattern.as_str(),
            score,
            context = breakdown.context,
            "candidate scored"
        );

        Some(Observation {
            address: address.to_string(),
            score,
            breakdown,
            start: raw.start,
            end: raw.end,
        })
    }

    fn into_candidate(&self, text: &str, observation: Observation) -> AddressCandidate {
        let labeled = observation.breakdown.labeled;
        let context_clues = self
            .clues
            .extract(text, observation.start, observation.end, self.config.clue_window, labeled)
            .unwrap_or_else(|e| {
                warn!(address = %observation.address, code = e.code_str(), "context clues unavailable: {}", e);
                Vec::new()
            });

        AddressCandidate {
            kind: self.validator.classify(&observation.address).kind(),
            address: observation.address,
            score: observation.score,
            context_clues,
            breakdown: observation.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{AddressKind, PatternKind};
    use crate::utils::constants::PUMP_FUN_PROGRAM;

    const ADDR: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn scanner() -> AddressCandidateScanner {
        AddressCandidateScanner::new(ScannerConfig::default()).unwrap()
    }

    #[test]
    fn test_scanner_creation() {
        assert!(AddressCandidateScanner::new(ScannerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScannerConfig {
            cache_ttl_secs: 0,
            ..ScannerConfig::default()
        };
        assert!(AddressCandidateScanner::new(config).is_err());
    }

    #[test]
    fn test_best_observation_wins() {
        let text = format!("CA: {}", ADDR);
        let results = scanner().scan(&text, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].breakdown.pattern, PatternKind::Strict);
        assert!(results[0].breakdown.labeled);
    }

    #[test]
    fn test_program_typed() {
        let text = format!("pump program {}", PUMP_FUN_PROGRAM);
        let results = scanner().scan(&text, 10);
        assert_eq!(results[0].address, PUMP_FUN_PROGRAM);
        assert_eq!(results[0].kind, AddressKind::Program);
    }

    #[test]
    fn test_zero_and_empty() {
        let s = scanner();
        assert!(s.scan(ADDR, 0).is_empty());
        assert!(s.scan("", 10).is_empty());
        assert!(s.best_candidate("nothing to see").is_none());
    }

    #[test]
    fn test_emoji_text_does_not_break_windows() {
        let text = format!("🚀🚀🚀 buy {} 🌕🌕", ADDR);
        let results = scanner().scan(&text, 10);
        assert_eq!(results.len(), 1);
        assert!(results[0].context_clues.contains(&"trading".to_string()));
    }

    #[test]
    fn test_telemetry_records_scans() {
        let telemetry = Arc::new(ScanTelemetry::new());
        let s = scanner().with_telemetry(telemetry.clone());
        s.scan(ADDR, 5);
        s.scan("nothing", 5);
        let stats = telemetry.get_stats();
        assert_eq!(stats.total_scans, 2);
        assert_eq!(stats.scans_with_candidates, 1);
        assert_eq!(stats.total_candidates, 1);
    }
}
