//! Extraction patterns
//!
//! Four regexes, run in a fixed order, each with its own base priority. The
//! suffix pattern is assembled from the `MEME_SUFFIXES` word table.

use regex::Regex;

use crate::models::config::PatternPriorities;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::PatternKind;
use crate::utils::constants::{BASE58_CLASS, MEME_SUFFIXES};

/// One pattern hit; offsets are bytes into the scanned text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMatch {
    pub pattern: PatternKind,
    pub priority: f64,
    pub start: usize,
    pub end: usize,
}

struct CompiledPattern {
    kind: PatternKind,
    priority: f64,
    regex: Regex,
}

/// Compiled extraction patterns in run order
pub struct ExtractionPatterns {
    patterns: Vec<CompiledPattern>,
}

impl ExtractionPatterns {
    pub fn new(priorities: &PatternPriorities) -> AppResult<Self> {
        Self::with_suffixes(priorities, MEME_SUFFIXES)
    }

    /// Build with a custom suffix word list
    pub fn with_suffixes(priorities: &PatternPriorities, suffixes: &[&str]) -> AppResult<Self> {
        let mut patterns = Vec::with_capacity(PatternKind::ALL.len());

        for kind in PatternKind::ALL {
            let source = pattern_source(kind, suffixes);
            let regex =
                Regex::new(&source).map_err(|e| AppError::pattern_compile(kind.as_str(), e))?;
            let priority = match kind {
                PatternKind::Strict => priorities.strict,
                PatternKind::Loose => priorities.loose,
                PatternKind::Suffix => priorities.suffix,
                PatternKind::Anchored => priorities.anchored,
            };
            patterns.push(CompiledPattern { kind, priority, regex });
        }

        Ok(Self { patterns })
    }

    /// Every match of every pattern, pattern order first, then text order
    pub fn find_all(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    matches.push(RawMatch {
                        pattern: pattern.kind,
                        priority: pattern.priority,
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }
        matches
    }
}

/// Regex source for a pattern; group 1 is always the address
fn pattern_source(kind: PatternKind, suffixes: &[&str]) -> String {
    let b = BASE58_CLASS;
    match kind {
        PatternKind::Strict => format!(r"\b({b}{{43,44}})\b"),
        PatternKind::Loose => format!(r"\b({b}{{32,42}})\b"),
        PatternKind::Suffix => {
            let mut words: Vec<&str> = suffixes.iter().copied().filter(|w| !w.is_empty()).collect();
            // Sorted only for a stable pattern source. The generic trailer already
            // accepts every word; the table is kept as independently editable data.
            words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            if alternation.is_empty() {
                format!(r"\b({b}{{25,}}[A-Za-z0-9]{{1,8}})\b")
            } else {
                format!(r"\b({b}{{25,}}(?:(?i:{alternation})|[A-Za-z0-9]{{1,8}}))\b")
            }
        }
        PatternKind::Anchored => {
            format!(r"(?:/|@|\$|(?i:\bca|\bcontract|\btoken|\bmint)\s*:\s*)({b}{{25,50}})\b")
        }
    }
}
