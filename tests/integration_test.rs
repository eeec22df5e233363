//! Integration tests for CA Sentry

use ca_sentry::utils::constants::{KNOWN_ADDRESSES, SYSTEM_PROGRAM};
use ca_sentry::{
    AddressCandidateScanner, AddressKind, Classification, ManualClock, MessageMetadataExtractor,
    ScannerConfig,
};
use std::sync::Arc;
use std::time::Duration;

const ADDR: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
const PUMP_MINT: &str = "9BB6NFEcjBCtnNLFko2FqVQBq8HHM13kCyYcdQbgpump";
const OTHER: &str = "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm";

/// Filler with no scoring keywords, longer than the context window
const FILLER: &str = "the weather today is mild and the river is calm while birds drift over \
                      the hills near the quiet village road and the farms beyond it";

fn scanner() -> AddressCandidateScanner {
    AddressCandidateScanner::new(ScannerConfig::default()).unwrap()
}

// ============================================
// Scenarios
// ============================================

#[test]
fn test_labeled_address_ranks_first() {
    let results = scanner().scan(&format!("CA: {} check this out", ADDR), 10);

    assert!(!results.is_empty());
    assert_eq!(results[0].address, ADDR);
    assert!(
        results[0].context_clues.iter().any(|c| c == "labeled-address"),
        "labeled prefix should surface as a clue: {:?}",
        results[0].context_clues
    );
    assert!(results[0].breakdown.labeled);
}

#[test]
fn test_system_program_is_valid_program() {
    let s = scanner();
    assert!(s.is_valid_address(SYSTEM_PROGRAM));
    assert_eq!(s.classify(SYSTEM_PROGRAM), Classification::Known(AddressKind::Program));

    let results = s.scan(SYSTEM_PROGRAM, 5);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, AddressKind::Program);
}

#[test]
fn test_repeated_characters_rejected() {
    let s = scanner();
    let repeated = "a".repeat(35);
    assert!(!s.is_valid_address(&repeated));
    assert!(s.scan(&repeated, 10).is_empty());
}

#[test]
fn test_low_entropy_long_string_rejected() {
    let s = scanner();
    let long: String = "Ab3Cd4Ef5Gh6Jk".chars().cycle().take(46).collect();
    assert!(!s.is_valid_address(&long));
    assert!(s.scan(&format!("CA: {}", long), 10).is_empty());
}

#[test]
fn test_plain_text_has_no_candidates() {
    assert!(scanner().scan("hello world, nothing here", 10).is_empty());
}

#[test]
fn test_trading_context_outranks_bare_address() {
    // BONK has lower entropy than ADDR, so only context can lift it
    let text = format!("buy {} now on raydium, swap fast. {} {}", BONK, FILLER, ADDR);
    let results = scanner().scan(&text, 10);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].address, BONK);
    assert_eq!(results[1].address, ADDR);
    assert!(results[0].score > results[1].score);
    assert!(results[0].context_clues.contains(&"trading".to_string()));
    assert!(results[1].context_clues.is_empty());
}

#[test]
fn test_zero_max_results() {
    let s = scanner();
    assert!(s.scan(&format!("CA: {}", ADDR), 0).is_empty());
    assert!(s.scan("", 0).is_empty());
}

// ============================================
// Properties
// ============================================

#[test]
fn test_length_bounds() {
    let s = scanner();
    let long: String = format!("{}{}", ADDR, OTHER);

    for len in (1..25).chain(51..=long.len().min(70)) {
        let candidate = &long[..len];
        assert!(!s.is_valid_address(candidate), "length {} must be rejected", len);
    }
}

#[test]
fn test_non_base58_rejected() {
    let s = scanner();
    for bad in ['0', 'O', 'I', 'l', '_', '-', ' '] {
        let mut chars: Vec<char> = ADDR.chars().collect();
        chars[20] = bad;
        let candidate: String = chars.into_iter().collect();
        assert!(!s.is_valid_address(&candidate), "{:?} must be rejected", bad);
    }
    assert!(s.is_valid_address(ADDR));
}

#[test]
fn test_results_unique_sorted_and_bounded() {
    let s = scanner();
    let text = format!(
        "CA: {a} buy {b} | {c} chart {a} also https://pump.fun/coin/{c} and {d} tg {b}",
        a = ADDR,
        b = BONK,
        c = PUMP_MINT,
        d = OTHER
    );

    for max in 0..6 {
        let results = s.scan(&text, max);
        assert!(results.len() <= max);

        let mut seen = std::collections::HashSet::new();
        assert!(results.iter().all(|c| seen.insert(c.address.clone())));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
    assert_eq!(s.scan(&text, 10).len(), 4);
}

#[test]
fn test_known_programs_typed_program() {
    let s = scanner();
    for known in KNOWN_ADDRESSES.iter().filter(|k| k.kind == AddressKind::Program) {
        assert!(s.is_valid_address(known.address), "{} should validate", known.name);
        assert_eq!(s.classify(known.address).kind(), AddressKind::Program, "{}", known.name);
    }
}

#[test]
fn test_scan_is_idempotent() {
    let s = scanner();
    let text = format!("new launch {} aped, also {} on twitter", PUMP_MINT, OTHER);
    let first = s.scan(&text, 10);
    assert_eq!(first.len(), 2);

    for _ in 0..100 {
        assert_eq!(s.scan(&text, 10), first);
        // a fresh scanner has a fresh cache and must agree as well
        assert_eq!(scanner().scan(&text, 10), first);
    }
}

#[test]
fn test_cache_entries_expire_after_ttl() {
    let clock = Arc::new(ManualClock::new());
    let s = AddressCandidateScanner::with_clock(ScannerConfig::default(), clock.clone()).unwrap();
    let validator = s.validator();

    assert!(s.is_valid_address(ADDR));
    assert!(s.is_valid_address(ADDR));
    assert_eq!(validator.validations_computed(), 1);

    clock.advance(Duration::from_secs(300));
    assert!(s.is_valid_address(ADDR));
    assert_eq!(validator.validations_computed(), 1, "exactly at TTL still served from cache");

    clock.advance(Duration::from_millis(1));
    assert!(s.is_valid_address(ADDR));
    assert_eq!(validator.validations_computed(), 2);
}

// ============================================
// Supplementary behavior
// ============================================

#[test]
fn test_pump_suffix_mint_found_in_link() {
    let results = scanner().scan(&format!("https://pump.fun/coin/{}", PUMP_MINT), 5);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].address, PUMP_MINT);
}

#[test]
fn test_on_chain_validation_serves_heuristic_result() {
    let s = scanner();
    assert_eq!(s.validate_on_chain(ADDR), Classification::Unclassified);
    assert_eq!(s.validate_on_chain("not an address"), Classification::Invalid);
}

#[test]
fn test_message_metadata() {
    let s = scanner();
    let extractor = MessageMetadataExtractor::new().unwrap();
    let text = format!(
        "$BONK CA: {} chart https://dexscreener.com/solana/{} pic https://i.imgur.com/x.png",
        BONK, BONK
    );
    let metadata = extractor.extract(&s, &text, 3);

    assert_eq!(metadata.contract_address.as_deref(), Some(BONK));
    assert_eq!(metadata.links.len(), 2);
    assert_eq!(metadata.images, vec!["https://i.imgur.com/x.png".to_string()]);
    assert_eq!(metadata.tickers, vec!["BONK".to_string()]);
}
