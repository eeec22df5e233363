//! Address Validator
//!
//! Heuristic check that a base58-looking string is plausibly a Solana
//! address. Nothing here touches the network; results are memoized in a
//! [`ValidationCache`] owned by the validator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::core::scoring::shannon_entropy;
use crate::models::config::ScannerConfig;
use crate::models::types::{AddressKind, Classification};
use crate::utils::cache::{Clock, SystemClock, ValidationCache};
use crate::utils::constants::{
    is_base58_char, known_address, MAX_ADDRESS_LEN, MAX_ONES_RUN, MAX_REPEAT_RUN,
    MIN_ADDRESS_LEN, SINGLE_CASE_MIN_LEN, STANDARD_MAX_LEN, STANDARD_MIN_LEN,
};

/// Why a string was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Length,
    Alphabet,
    LowEntropy,
    RepeatedChars,
    SingleCase,
    HexLike,
    NoVariety,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Length => "length",
            Rejection::Alphabet => "alphabet",
            Rejection::LowEntropy => "low_entropy",
            Rejection::RepeatedChars => "repeated_chars",
            Rejection::SingleCase => "single_case",
            Rejection::HexLike => "hex_like",
            Rejection::NoVariety => "no_variety",
        }
    }
}

/// Uncached classification of `address`
pub fn evaluate(address: &str, config: &ScannerConfig) -> Result<Classification, Rejection> {
    let len = address.chars().count();
    if !(MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&len) {
        return Err(Rejection::Length);
    }
    if !address.chars().all(is_base58_char) {
        return Err(Rejection::Alphabet);
    }
    if let Some(known) = known_address(address) {
        return Ok(Classification::Known(known.kind));
    }

    let entropy = shannon_entropy(address);
    if entropy < config.min_entropy {
        return Err(Rejection::LowEntropy);
    }

    check_invalid_patterns(address, len)?;

    if (STANDARD_MIN_LEN..=STANDARD_MAX_LEN).contains(&len) {
        let has_digit = address.chars().any(|c| c.is_ascii_digit());
        let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
        if !(has_digit && has_upper && has_lower) {
            return Err(Rejection::NoVariety);
        }
    } else if len > STANDARD_MAX_LEN && entropy <= config.min_entropy_suffix {
        return Err(Rejection::LowEntropy);
    }

    Ok(Classification::Unclassified)
}

/// Shapes that show up in chat but are not Solana addresses
fn check_invalid_patterns(address: &str, len: usize) -> Result<(), Rejection> {
    if longest_run(address, None) > MAX_REPEAT_RUN {
        return Err(Rejection::RepeatedChars);
    }

    let upper_only = address.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let lower_only = address.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if (upper_only || lower_only) && len < SINGLE_CASE_MIN_LEN {
        return Err(Rejection::SingleCase);
    }

    let hex_body = len >= 40 && address.chars().all(|c| matches!(c, 'a'..='f' | '0'..='9'));
    if hex_body || address.starts_with("0x") || longest_run(address, Some('1')) > MAX_ONES_RUN {
        return Err(Rejection::HexLike);
    }

    Ok(())
}

/// Longest run of one char, optionally only runs of `only`
fn longest_run(s: &str, only: Option<char>) -> usize {
    let mut best = 0;
    let mut current = 0;
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if prev == Some(c) {
            current += 1;
        } else {
            current = 1;
            prev = Some(c);
        }
        if only.map_or(true, |o| o == c) {
            best = best.max(current);
        }
    }
    best
}

/// Memoizing validator
pub struct AddressValidator {
    config: ScannerConfig,
    cache: ValidationCache,
    computed: AtomicU64,
}

impl AddressValidator {
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ScannerConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = ValidationCache::with_clock(config.cache_ttl(), config.cache_prune_threshold, clock);
        Self {
            config,
            cache,
            computed: AtomicU64::new(0),
        }
    }

    /// Three-state classification, served from cache while fresh
    pub fn classify(&self, address: &str) -> Classification {
        if let Some(entry) = self.cache.get(address) {
            return match (entry.is_valid, entry.kind) {
                (false, _) => Classification::Invalid,
                (true, Some(kind)) => Classification::Known(kind),
                (true, None) => Classification::Unclassified,
            };
        }

        self.computed.fetch_add(1, Ordering::Relaxed);
        let classification = match evaluate(address, &self.config) {
            Ok(classification) => classification,
            Err(reason) => {
                debug!(address, reason = reason.as_str(), "address rejected");
                Classification::Invalid
            }
        };

        self.cache.put(address, classification.is_valid(), classification.known_kind());
        classification
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        self.classify(address).is_valid()
    }

    /// Kind of a valid address (`Unknown` when unclassified), None if invalid
    pub fn address_kind(&self, address: &str) -> Option<AddressKind> {
        let classification = self.classify(address);
        classification.is_valid().then(|| classification.kind())
    }

    /// Stand-in for an on-chain lookup: only ever the heuristic result
    pub fn validate_on_chain(&self, address: &str) -> Classification {
        debug!(address, "on-chain validation not performed, serving heuristic result");
        self.classify(address)
    }

    /// Number of validations that were computed rather than served from cache
    pub fn validations_computed(&self) -> u64 {
        self.computed.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &ValidationCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::cache::ManualClock;
    use crate::utils::constants::{KNOWN_ADDRESSES, SYSTEM_PROGRAM, WRAPPED_SOL_MINT};
    use std::time::Duration;

    const ADDR: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn eval(address: &str) -> Result<Classification, Rejection> {
        evaluate(address, &ScannerConfig::default())
    }

    #[test]
    fn test_typical_mint_is_unclassified() {
        assert_eq!(eval(ADDR), Ok(Classification::Unclassified));
        assert_eq!(
            eval("9BB6NFEcjBCtnNLFko2FqVQBq8HHM13kCyYcdQbgpump"),
            Ok(Classification::Unclassified)
        );
    }

    #[test]
    fn test_known_programs() {
        assert_eq!(eval(SYSTEM_PROGRAM), Ok(Classification::Known(AddressKind::Program)));
        assert_eq!(eval(WRAPPED_SOL_MINT), Ok(Classification::Known(AddressKind::Mint)));
        for known in KNOWN_ADDRESSES {
            assert!(eval(known.address).is_ok(), "{}", known.name);
        }
    }

    #[test]
    fn test_length_and_alphabet() {
        assert_eq!(eval(&ADDR[..24]), Err(Rejection::Length));
        assert_eq!(eval(&format!("{}{}", ADDR, "abcdefg")), Err(Rejection::Length));
        assert_eq!(eval("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAs0"), Err(Rejection::Alphabet));
        assert_eq!(eval("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsl"), Err(Rejection::Alphabet));
    }

    #[test]
    fn test_repeated_char_string() {
        let s = "a".repeat(35);
        assert_eq!(eval(&s), Err(Rejection::LowEntropy));
        assert_eq!(longest_run(&s, None), 35);
    }

    #[test]
    fn test_repeat_run_rule() {
        let s = format!("{}{}", "z".repeat(11), &ADDR[..33]);
        assert_eq!(check_invalid_patterns(&s, 44), Err(Rejection::RepeatedChars));
        let s = format!("{}{}", "z".repeat(10), &ADDR[..34]);
        assert_eq!(check_invalid_patterns(&s, 44), Ok(()));
    }

    #[test]
    fn test_single_case_short_strings() {
        assert_eq!(
            check_invalid_patterns("ABCDEFGHJKLMNPQRSTUVWXYZ23456789", 32),
            Err(Rejection::SingleCase)
        );
        assert_eq!(
            check_invalid_patterns("abcdefghijkmnopqrstuvwxyz23456789", 33),
            Err(Rejection::SingleCase)
        );
    }

    #[test]
    fn test_hex_like() {
        let hex = "abcdef0123456789".repeat(3);
        assert_eq!(check_invalid_patterns(&hex[..40], 40), Err(Rejection::HexLike));
        let ones = format!("{}Ab3", "1".repeat(20));
        assert_eq!(check_invalid_patterns(&ones, 23), Err(Rejection::RepeatedChars));
    }

    #[test]
    fn test_variety_required_in_standard_range() {
        // 36 chars, high entropy, no digit
        let s = "ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkm";
        assert_eq!(eval(s), Err(Rejection::NoVariety));
    }

    #[test]
    fn test_entropy_floor_applies_to_long_strings() {
        // 46 chars cycling 14 symbols: entropy between 3.5 and 4.0
        let long: String = "Ab3Cd4Ef5Gh6Jk".chars().cycle().take(46).collect();
        let entropy = shannon_entropy(&long);
        assert!(entropy > 3.5 && entropy < 4.0, "entropy {}", entropy);
        assert_eq!(eval(&long), Err(Rejection::LowEntropy));

        let suffixed = format!("{}bonk", ADDR);
        assert!(shannon_entropy(&suffixed) >= 4.0);
        assert_eq!(eval(&suffixed), Ok(Classification::Unclassified));
    }

    #[test]
    fn test_validator_caches_results() {
        let validator = AddressValidator::new(ScannerConfig::default());
        assert!(validator.is_valid_address(ADDR));
        assert!(validator.is_valid_address(ADDR));
        assert!(!validator.is_valid_address("hello"));
        assert_eq!(validator.validations_computed(), 2);
        assert_eq!(validator.cache().len(), 2);
    }

    #[test]
    fn test_cached_known_kind_survives() {
        let validator = AddressValidator::new(ScannerConfig::default());
        validator.classify(SYSTEM_PROGRAM);
        assert_eq!(validator.classify(SYSTEM_PROGRAM), Classification::Known(AddressKind::Program));
        assert_eq!(validator.address_kind(SYSTEM_PROGRAM), Some(AddressKind::Program));
        assert_eq!(validator.address_kind("0xdeadbeef"), None);
        assert_eq!(validator.validations_computed(), 2);
    }

    #[test]
    fn test_stale_entry_is_recomputed() {
        let clock = Arc::new(ManualClock::new());
        let validator = AddressValidator::with_clock(ScannerConfig::default(), clock.clone());

        validator.classify(ADDR);
        clock.advance(Duration::from_secs(299));
        validator.classify(ADDR);
        assert_eq!(validator.validations_computed(), 1);

        clock.advance(Duration::from_secs(2));
        validator.classify(ADDR);
        assert_eq!(validator.validations_computed(), 2);
    }

    #[test]
    fn test_on_chain_stub_matches_heuristic() {
        let validator = AddressValidator::new(ScannerConfig::default());
        assert_eq!(validator.validate_on_chain(ADDR), validator.classify(ADDR));
        assert_eq!(validator.validations_computed(), 1);
    }
}
