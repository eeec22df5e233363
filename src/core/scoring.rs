//! Candidate Scoring Module
//!
//! Composite score of one pattern observation:
//!
//! `priority × w_p + context × w_c + entropy × w_e + length × w_l`
//!
//! - priority: base weight of the pattern that matched
//! - context: keyword hits around the match plus a bonus for labeled mentions
//! - entropy: Shannon entropy of the address (bits/char)
//! - length: how close the length is to a canonical address

use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use crate::core::window;
use crate::models::config::ScannerConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{PatternKind, ScoreBreakdown};
use crate::utils::constants::{
    CANONICAL_MAX_LEN, CANONICAL_MIN_LEN, LABEL_PREFIX_PATTERN, MAX_ADDRESS_LEN, PRICE_KEYWORDS,
    SOCIAL_KEYWORDS, STANDARD_MIN_LEN, TECHNICAL_KEYWORDS, TOKEN_KEYWORDS, TRADING_KEYWORDS,
};

/// Shannon entropy of the character distribution, in bits per char.
/// Summed in char order so equal inputs give bit-identical results.
pub fn shannon_entropy(s: &str) -> f64 {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// 1.0 canonical, 0.8 standard, 0.6 suffix-style, 0.3 otherwise
pub fn length_score(len: usize) -> f64 {
    match len {
        CANONICAL_MIN_LEN..=CANONICAL_MAX_LEN => 1.0,
        STANDARD_MIN_LEN..=42 => 0.8,
        45..=MAX_ADDRESS_LEN => 0.6,
        _ => 0.3,
    }
}

/// Keyword category used by the context score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Trading,
    Price,
    Token,
    Social,
    Technical,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Trading,
        KeywordCategory::Price,
        KeywordCategory::Token,
        KeywordCategory::Social,
        KeywordCategory::Technical,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Trading => TRADING_KEYWORDS,
            KeywordCategory::Price => PRICE_KEYWORDS,
            KeywordCategory::Token => TOKEN_KEYWORDS,
            KeywordCategory::Social => SOCIAL_KEYWORDS,
            KeywordCategory::Technical => TECHNICAL_KEYWORDS,
        }
    }

    fn weight(&self, config: &ScannerConfig) -> f64 {
        let weights = &config.categories;
        match self {
            KeywordCategory::Trading => weights.trading,
            KeywordCategory::Price => weights.price,
            KeywordCategory::Token => weights.token,
            KeywordCategory::Social => weights.social,
            KeywordCategory::Technical => weights.technical,
        }
    }
}

/// Context score of one match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextScore {
    pub value: f64,
    pub labeled: bool,
}

/// Keyword and label matcher for the context component
pub struct ContextScorer {
    categories: Vec<(KeywordCategory, Regex)>,
    label: Regex,
}

impl ContextScorer {
    pub fn new() -> AppResult<Self> {
        let mut categories = Vec::with_capacity(KeywordCategory::ALL.len());
        for category in KeywordCategory::ALL {
            let alternation = category
                .keywords()
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
                .map_err(|e| AppError::pattern_compile("keyword category", e))?;
            categories.push((category, regex));
        }
        let label = Regex::new(LABEL_PREFIX_PATTERN)
            .map_err(|e| AppError::pattern_compile("label prefix", e))?;

        Ok(Self { categories, label })
    }

    /// Distinct keywords of `category` present in `window`
    pub fn keyword_hits(&self, category: KeywordCategory, window: &str) -> usize {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, regex)| {
                regex
                    .find_iter(window)
                    .map(|m| m.as_str().to_lowercase())
                    .collect::<HashSet<_>>()
                    .len()
            })
            .unwrap_or(0)
    }

    /// Whether the chars right before a match label it as an address
    pub fn is_labeled(&self, text: &str, start: usize, config: &ScannerConfig) -> AppResult<bool> {
        let before = window::preceding(text, start, config.prefix_window)?;
        Ok(self.label.is_match(before))
    }

    /// Context score of the match at `start..end`, clamped to `context_max`
    pub fn score(
        &self,
        text: &str,
        start: usize,
        end: usize,
        config: &ScannerConfig,
    ) -> AppResult<ContextScore> {
        let around = window::surrounding(text, start, end, config.context_window)?;

        let mut value = config.context_base;
        for (category, _) in &self.categories {
            let hits = self.keyword_hits(*category, around);
            value += hits as f64 * category.weight(config) * config.keyword_factor;
        }

        let labeled = self.is_labeled(text, start, config)?;
        if labeled {
            value += config.label_bonus;
        }

        Ok(ContextScore {
            value: value.min(config.context_max),
            labeled,
        })
    }
}

/// Full breakdown for one observation
pub fn breakdown(
    address: &str,
    pattern: PatternKind,
    priority: f64,
    context: ContextScore,
) -> ScoreBreakdown {
    ScoreBreakdown {
        pattern,
        priority,
        context: context.value,
        entropy: shannon_entropy(address),
        length: length_score(address.chars().count()),
        labeled: context.labeled,
    }
}

/// Weighted sum of the breakdown components
pub fn composite(parts: &ScoreBreakdown, config: &ScannerConfig) -> f64 {
    let w = &config.composite;
    w.priority * parts.priority
        + w.context * parts.context
        + w.entropy * parts.entropy
        + w.length * parts.length
}
