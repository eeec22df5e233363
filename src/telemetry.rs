//! Telemetry Module
//!
//! Anonymous scan statistics for monitoring:
//! - how many messages were scanned and how many produced a candidate
//! - which context clues the winning candidates carried
//! - scan latency
//!
//! Addresses and message text are never stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::models::types::AddressCandidate;

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TelemetryStats {
    /// Total scan calls
    pub total_scans: u64,
    /// Scans that returned at least one candidate
    pub scans_with_candidates: u64,
    /// Candidates returned across all scans
    pub total_candidates: u64,
    /// Top candidates that followed a `CA:`-style label
    pub labeled_hits: u64,
    /// Context clue tags seen on top candidates
    pub clues_by_tag: HashMap<String, u64>,
    /// Average scan latency (microseconds)
    pub avg_latency_us: f64,
    /// Period start (unix seconds)
    pub period_start: i64,
    /// Period end (unix seconds)
    pub period_end: i64,
}

impl TelemetryStats {
    /// Share of scans that found something, in percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_scans == 0 {
            0.0
        } else {
            self.scans_with_candidates as f64 / self.total_scans as f64 * 100.0
        }
    }

    /// Plain text summary for shutdown logs
    pub fn summary(&self) -> String {
        format!(
            "scans={} with_candidates={} ({:.1}%) candidates={} labeled={} avg_latency={:.1}us",
            self.total_scans,
            self.scans_with_candidates,
            self.hit_rate(),
            self.total_candidates,
            self.labeled_hits,
            self.avg_latency_us,
        )
    }
}

/// Scan telemetry collector
pub struct ScanTelemetry {
    total_scans: AtomicU64,
    scans_with_candidates: AtomicU64,
    total_candidates: AtomicU64,
    labeled_hits: AtomicU64,
    total_latency_us: AtomicU64,
    clue_counts: RwLock<HashMap<String, u64>>,
    session_start: i64,
}

impl ScanTelemetry {
    pub fn new() -> Self {
        Self {
            total_scans: AtomicU64::new(0),
            scans_with_candidates: AtomicU64::new(0),
            total_candidates: AtomicU64::new(0),
            labeled_hits: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            clue_counts: RwLock::new(HashMap::new()),
            session_start: chrono::Utc::now().timestamp(),
        }
    }

    /// Record one scan call and its result
    pub fn record_scan(&self, candidates: &[AddressCandidate], latency: Duration) {
        self.total_scans.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);

        let Some(top) = candidates.first() else {
            return;
        };

        self.scans_with_candidates.fetch_add(1, Ordering::Relaxed);
        self.total_candidates
            .fetch_add(candidates.len() as u64, Ordering::Relaxed);
        if top.breakdown.labeled {
            self.labeled_hits.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut counts) = self.clue_counts.write() {
            for clue in &top.context_clues {
                *counts.entry(clue.clone()).or_insert(0) += 1;
            }
        }
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let total_scans = self.total_scans.load(Ordering::Relaxed);
        let total_latency = self.total_latency_us.load(Ordering::Relaxed);

        let avg_latency_us = if total_scans > 0 {
            total_latency as f64 / total_scans as f64
        } else {
            0.0
        };

        TelemetryStats {
            total_scans,
            scans_with_candidates: self.scans_with_candidates.load(Ordering::Relaxed),
            total_candidates: self.total_candidates.load(Ordering::Relaxed),
            labeled_hits: self.labeled_hits.load(Ordering::Relaxed),
            clues_by_tag: self
                .clue_counts
                .read()
                .map(|counts| counts.clone())
                .unwrap_or_default(),
            avg_latency_us,
            period_start: self.session_start,
            period_end: chrono::Utc::now().timestamp(),
        }
    }

    /// Write current stats as pretty JSON into `dir`
    pub fn export_stats_json(&self, dir: &Path) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(dir)?;
        let stats = self.get_stats();
        let path = dir.join(format!("scan_stats_{}.json", stats.period_end));

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    /// Reset counters (for a new reporting period)
    pub fn reset(&self) {
        self.total_scans.store(0, Ordering::Relaxed);
        self.scans_with_candidates.store(0, Ordering::Relaxed);
        self.total_candidates.store(0, Ordering::Relaxed);
        self.labeled_hits.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);
        if let Ok(mut counts) = self.clue_counts.write() {
            counts.clear();
        }
    }
}

impl Default for ScanTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{AddressKind, PatternKind, ScoreBreakdown};

    fn candidate(labeled: bool, clues: &[&str]) -> AddressCandidate {
        AddressCandidate {
            address: "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string(),
            score: 5.0,
            kind: AddressKind::Unknown,
            context_clues: clues.iter().map(|c| c.to_string()).collect(),
            breakdown: ScoreBreakdown {
                pattern: PatternKind::Strict,
                priority: 10.0,
                context: 1.0,
                entropy: 4.9,
                length: 1.0,
                labeled,
            },
        }
    }

    #[test]
    fn test_record_and_stats() {
        let telemetry = ScanTelemetry::new();
        telemetry.record_scan(&[candidate(true, &["labeled-address", "trading"])], Duration::from_micros(40));
        telemetry.record_scan(&[candidate(false, &["trading"]), candidate(false, &[])], Duration::from_micros(20));
        telemetry.record_scan(&[], Duration::from_micros(30));

        let stats = telemetry.get_stats();
        assert_eq!(stats.total_scans, 3);
        assert_eq!(stats.scans_with_candidates, 2);
        assert_eq!(stats.total_candidates, 3);
        assert_eq!(stats.labeled_hits, 1);
        assert_eq!(stats.clues_by_tag.get("trading"), Some(&2));
        assert!((stats.avg_latency_us - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let telemetry = ScanTelemetry::new();
        telemetry.record_scan(&[candidate(true, &["trading"])], Duration::from_micros(5));
        telemetry.reset();
        let stats = telemetry.get_stats();
        assert_eq!(stats.total_scans, 0);
        assert!(stats.clues_by_tag.is_empty());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_export_json() {
        let dir = std::env::temp_dir().join(format!("ca_sentry_telemetry_{}", std::process::id()));
        let telemetry = ScanTelemetry::new();
        telemetry.record_scan(&[], Duration::from_micros(1));
        let path = telemetry.export_stats_json(&dir).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: TelemetryStats = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.total_scans, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
