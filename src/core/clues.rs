//! Context clue tags for a winning candidate.
//!
//! Display-only: this pass does not feed the score.

use regex::Regex;

use crate::core::window;
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{CONTEXT_CLUE_PATTERNS, LABELED_ADDRESS_CLUE};

pub struct ContextClueExtractor {
    patterns: Vec<(&'static str, Regex)>,
}

impl ContextClueExtractor {
    pub fn new() -> AppResult<Self> {
        let patterns = CONTEXT_CLUE_PATTERNS
            .iter()
            .map(|(tag, source)| {
                Regex::new(source)
                    .map(|regex| (*tag, regex))
                    .map_err(|e| AppError::pattern_compile(tag, e))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Tags for the `radius`-char window around `start..end`.
    /// `labeled-address` comes first when the match was labeled.
    pub fn extract(
        &self,
        text: &str,
        start: usize,
        end: usize,
        radius: usize,
        labeled: bool,
    ) -> AppResult<Vec<String>> {
        let around = window::surrounding(text, start, end, radius)?;

        let mut clues = Vec::new();
        if labeled {
            clues.push(LABELED_ADDRESS_CLUE.to_string());
        }
        clues.extend(
            self.patterns
                .iter()
                .filter(|(_, regex)| regex.is_match(around))
                .map(|(tag, _)| tag.to_string()),
        );
        Ok(clues)
    }
}
