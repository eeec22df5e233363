//! Constants Module - Single Source of Truth
//!
//! Address tables, keyword tables and default limits used across the crate.
//! Pattern tables are plain data; the scanner compiles them once at
//! construction.

use crate::models::types::AddressKind;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "CA Sentry";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default results returned by a scan
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default validation cache TTL (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Cache size above which stale entries are swept
pub const DEFAULT_CACHE_PRUNE_THRESHOLD: usize = 1000;

/// Default API port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Requests per rate limit window
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 300;

/// Rate limit window (seconds)
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Maximum messages in one batch scan
pub const MAX_BATCH_MESSAGES: usize = 100;

/// Upper bound on `max_results` accepted over the API
pub const MAX_RESULTS_LIMIT: usize = 50;

/// Largest message body accepted over the API (bytes)
pub const MAX_TEXT_BYTES: usize = 64 * 1024;

// ============================================
// ADDRESS SHAPE
// ============================================

/// Base58 alphabet (no 0, O, I, l)
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Base58 character class for building patterns
pub const BASE58_CLASS: &str = "[1-9A-HJ-NP-Za-km-z]";

pub const MIN_ADDRESS_LEN: usize = 25;
pub const MAX_ADDRESS_LEN: usize = 50;

/// Canonical Solana address lengths
pub const CANONICAL_MIN_LEN: usize = 43;
pub const CANONICAL_MAX_LEN: usize = 44;

/// Range where the char-variety rule applies
pub const STANDARD_MIN_LEN: usize = 32;
pub const STANDARD_MAX_LEN: usize = 44;

/// Longest allowed run of one repeated char
pub const MAX_REPEAT_RUN: usize = 10;

/// Single-case strings shorter than this are rejected
pub const SINGLE_CASE_MIN_LEN: usize = 35;

/// `1` runs at least this long look like padding, not an address
pub const MAX_ONES_RUN: usize = 19;

#[inline]
pub fn is_base58_char(c: char) -> bool {
    matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
}

// ============================================
// KNOWN ADDRESSES
// ============================================

/// Known address entry
#[derive(Debug, Clone, Copy)]
pub struct KnownAddress {
    pub name: &'static str,
    pub address: &'static str,
    pub kind: AddressKind,
}

pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
pub const TOKEN_2022_PROGRAM: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
pub const ASSOCIATED_TOKEN_PROGRAM: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const RAYDIUM_AMM_PROGRAM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const JUPITER_V6_PROGRAM: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";
pub const PUMP_FUN_PROGRAM: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";

pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

/// Addresses accepted without heuristics
pub const KNOWN_ADDRESSES: &[KnownAddress] = &[
    KnownAddress { name: "SPL Token Program", address: SPL_TOKEN_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "System Program", address: SYSTEM_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Token-2022 Program", address: TOKEN_2022_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Associated Token Program", address: ASSOCIATED_TOKEN_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Raydium AMM", address: RAYDIUM_AMM_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Jupiter Aggregator v6", address: JUPITER_V6_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Pump.fun", address: PUMP_FUN_PROGRAM, kind: AddressKind::Program },
    KnownAddress { name: "Wrapped SOL", address: WRAPPED_SOL_MINT, kind: AddressKind::Mint },
    KnownAddress { name: "USDC", address: USDC_MINT, kind: AddressKind::Mint },
    KnownAddress { name: "USDT", address: USDT_MINT, kind: AddressKind::Mint },
];

/// Look up a known address
pub fn known_address(address: &str) -> Option<&'static KnownAddress> {
    KNOWN_ADDRESSES.iter().find(|known| known.address == address)
}

// ============================================
// VANITY SUFFIXES
// ============================================

/// Words launchpads and vanity grinders append to mint addresses
pub const MEME_SUFFIXES: &[&str] = &[
    "pump", "bonk", "moon", "doge", "pepe", "shib", "inu", "wif", "hat", "cat", "dog",
    "frog", "meme", "coin", "token", "sol", "ai", "gpt", "elon", "trump", "maga", "based",
    "chad", "wojak", "kek", "floki", "baby", "mini", "king", "god", "ape", "gem", "lfg",
    "rocket", "bull", "bear", "whale", "degen", "fun", "bags", "jup", "ray",
];

// ============================================
// SCORING KEYWORDS
// ============================================

pub const TRADING_KEYWORDS: &[&str] = &[
    "buy", "buying", "bought", "sell", "selling", "sold", "trade", "trading", "swap", "ape",
    "aped", "snipe", "sniped", "entry", "exit", "long", "short", "jupiter", "raydium",
    "photon", "bullx", "dex",
];

pub const PRICE_KEYWORDS: &[&str] = &[
    "price", "mcap", "market cap", "marketcap", "ath", "chart", "pumping", "dumping",
    "gains", "profit", "10x", "100x", "1000x", "volume", "liquidity",
];

pub const TOKEN_KEYWORDS: &[&str] = &[
    "token", "coin", "ca", "contract", "mint", "address", "launch", "launched", "stealth",
    "presale", "ticker", "supply",
];

pub const SOCIAL_KEYWORDS: &[&str] = &[
    "twitter", "telegram", "tg", "discord", "community", "dev", "kol", "alpha", "call",
    "calls", "shill", "gem",
];

pub const TECHNICAL_KEYWORDS: &[&str] = &[
    "solana", "sol", "spl", "program", "lp", "burned", "burnt", "renounced", "holders",
    "audit", "rug", "bonding", "curve", "raydium",
];

// ============================================
// CONTEXT CLUE PATTERNS
// ============================================

/// Tag recorded when a match follows a `CA:`-style label
pub const LABELED_ADDRESS_CLUE: &str = "labeled-address";

/// (tag, pattern) pairs for the secondary clue pass
pub const CONTEXT_CLUE_PATTERNS: &[(&str, &str)] = &[
    ("price-related", r"(?i)\b(?:price|mcap|market\s*cap|ath|chart|\d+x)\b"),
    ("trading", r"(?i)\b(?:buy|sell|trade|trading|swap|aped?|snipe|entry|exit)\b"),
    ("speculative", r"(?i)\b(?:moon|gem|lfg|degen|send\s*it|pump(?:ing)?|100x|1000x)\b"),
    ("new-token", r"(?i)\b(?:new|launch(?:ed|ing)?|stealth|fair\s*launch|presale|just\s*(?:deployed|launched))\b"),
    ("technical-analysis", r"(?i)\b(?:support|resistance|breakout|volume|rsi|macd|fib|dip|ema)\b"),
    ("social-media", r"(?i)(?:twitter|x\.com|telegram|t\.me|discord|\btg\b)"),
];

/// Label that makes the following run a deliberate address mention.
/// Matched against the chars right before a match.
pub const LABEL_PREFIX_PATTERN: &str =
    r"(?i)(?:(?:\bca|contract|token|mint|address|addy)\s*[:=]\s*|[$@]\s*|/)$";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_matches_predicate() {
        assert_eq!(BASE58_ALPHABET.len(), 58);
        assert!(BASE58_ALPHABET.chars().all(is_base58_char));
        for c in ['0', 'O', 'I', 'l', '_', ' '] {
            assert!(!is_base58_char(c));
        }
    }

    #[test]
    fn test_known_addresses_are_base58() {
        for known in KNOWN_ADDRESSES {
            assert!(known.address.chars().all(is_base58_char), "{}", known.name);
            assert!(known.address.len() >= MIN_ADDRESS_LEN && known.address.len() <= MAX_ADDRESS_LEN);
        }
        assert_eq!(known_address(SYSTEM_PROGRAM).map(|k| k.kind), Some(AddressKind::Program));
        assert_eq!(known_address(USDC_MINT).map(|k| k.kind), Some(AddressKind::Mint));
    }

    #[test]
    fn test_suffix_table_is_lowercase_words() {
        assert!(MEME_SUFFIXES.iter().all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase())));
    }
}
