//! Chat message metadata: links, image links, `$TICKER` mentions and the
//! ranked contract-address candidates.

use regex::Regex;
use std::collections::HashSet;

use crate::core::scanner::AddressCandidateScanner;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::MessageMetadata;

const LINK_PATTERN: &str = r#"https?://[^\s<>"'`]+"#;
const TICKER_PATTERN: &str = r"\$([A-Za-z][A-Za-z0-9]{1,9})\b";
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub struct MessageMetadataExtractor {
    link: Regex,
    ticker: Regex,
}

impl MessageMetadataExtractor {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            link: Regex::new(LINK_PATTERN).map_err(|e| AppError::pattern_compile("link", e))?,
            ticker: Regex::new(TICKER_PATTERN).map_err(|e| AppError::pattern_compile("ticker", e))?,
        })
    }

    pub fn extract(
        &self,
        scanner: &AddressCandidateScanner,
        text: &str,
        max_results: usize,
    ) -> MessageMetadata {
        let candidates = scanner.scan(text, max_results);
        let links = self.links(text);
        let images = links.iter().filter(|l| is_image_link(l)).cloned().collect();

        MessageMetadata {
            contract_address: candidates.first().map(|c| c.address.clone()),
            candidates,
            links,
            images,
            tickers: self.tickers(text),
        }
    }

    /// URLs in order of appearance, deduplicated, trailing punctuation trimmed
    pub fn links(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.link
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(|c: char| ".,;:!?)]}>".contains(c)))
            .filter(|link| seen.insert(link.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Uppercased `$SYMBOL` mentions, first occurrence order.
    /// A `$` followed by a full address is not a ticker.
    pub fn tickers(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.ticker
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
            .filter(|symbol| seen.insert(symbol.clone()))
            .collect()
    }
}

fn is_image_link(link: &str) -> bool {
    let path = link.split(|c: char| c == '?' || c == '#').next().unwrap_or(link);
    path.rsplit('.')
        .next()
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
