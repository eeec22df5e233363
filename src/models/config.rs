//! Configuration for the address scanner and the API server
//!
//! Every tunable weight and threshold lives here; the defaults are the
//! behavioral target and are kept as-is.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    DEFAULT_CACHE_PRUNE_THRESHOLD, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_RESULTS,
    DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS, DEFAULT_SERVER_PORT,
    MAX_BATCH_MESSAGES,
};

/// Weights of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub priority: f64,
    pub context: f64,
    pub entropy: f64,
    pub length: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            priority: 0.4,
            context: 0.3,
            entropy: 0.2,
            length: 0.1,
        }
    }
}

/// Base priority of each extraction pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPriorities {
    pub strict: f64,
    pub loose: f64,
    pub suffix: f64,
    pub anchored: f64,
}

impl Default for PatternPriorities {
    fn default() -> Self {
        Self {
            strict: 10.0,
            loose: 8.0,
            suffix: 6.0,
            anchored: 9.0,
        }
    }
}

/// Weight of each keyword category in the context score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub trading: f64,
    pub price: f64,
    pub token: f64,
    pub social: f64,
    pub technical: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            trading: 2.0,
            price: 1.8,
            token: 1.6,
            social: 1.2,
            technical: 1.4,
        }
    }
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub composite: CompositeWeights,
    pub priorities: PatternPriorities,
    pub categories: CategoryWeights,
    /// Multiplier applied to a category weight per keyword hit
    pub keyword_factor: f64,
    /// Flat bonus when the match follows a `CA:`-style label
    pub label_bonus: f64,
    /// Starting value of the context score
    pub context_base: f64,
    /// Upper clamp of the context score
    pub context_max: f64,
    /// Chars scanned on each side of a match for keywords
    pub context_window: usize,
    /// Chars before a match checked for a label
    pub prefix_window: usize,
    /// Chars on each side of a winner scanned for context clues
    pub clue_window: usize,
    /// Minimum entropy (bits/char) of any address outside the known tables
    pub min_entropy: f64,
    /// Entropy a suffix-style address (> 44 chars) must exceed
    pub min_entropy_suffix: f64,
    pub cache_ttl_secs: u64,
    /// Cache size above which stale entries are swept
    pub cache_prune_threshold: usize,
    pub default_max_results: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            composite: CompositeWeights::default(),
            priorities: PatternPriorities::default(),
            categories: CategoryWeights::default(),
            keyword_factor: 0.1,
            label_bonus: 0.5,
            context_base: 1.0,
            context_max: 3.0,
            context_window: 100,
            prefix_window: 20,
            clue_window: 50,
            min_entropy: 4.0,
            min_entropy_suffix: 3.5,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_prune_threshold: DEFAULT_CACHE_PRUNE_THRESHOLD,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ScannerConfig {
    /// Defaults with `CA_SENTRY_*` environment overrides applied
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(ttl) = env_parse::<u64>("CA_SENTRY_CACHE_TTL_SECS")? {
            config.cache_ttl_secs = ttl;
        }
        if let Some(threshold) = env_parse::<usize>("CA_SENTRY_CACHE_PRUNE_THRESHOLD")? {
            config.cache_prune_threshold = threshold;
        }
        if let Some(max) = env_parse::<usize>("CA_SENTRY_MAX_RESULTS")? {
            config.default_max_results = max;
        }
        if let Some(min) = env_parse::<f64>("CA_SENTRY_MIN_ENTROPY")? {
            config.min_entropy = min;
        }
        if let Some(min) = env_parse::<f64>("CA_SENTRY_MIN_ENTROPY_SUFFIX")? {
            config.min_entropy_suffix = min;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCode::ConfigFileError,
                format!("Cannot read config file {}", path.display()),
                e,
            )
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("⚙️ Scanner config loaded from {}", path.display());
        Ok(config)
    }

    /// Reject values the scorer cannot work with
    pub fn validate(&self) -> AppResult<()> {
        let weights = [
            self.composite.priority,
            self.composite.context,
            self.composite.entropy,
            self.composite.length,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AppError::invalid_config("Composite weights must be finite and >= 0"));
        }
        if self.context_max < self.context_base {
            return Err(AppError::invalid_config(format!(
                "context_max ({}) must be >= context_base ({})",
                self.context_max, self.context_base
            )));
        }
        if self.min_entropy_suffix > self.min_entropy {
            return Err(AppError::invalid_config(
                "min_entropy_suffix must not exceed min_entropy",
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(AppError::invalid_config("cache_ttl_secs must be > 0"));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
    pub max_batch_messages: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_SERVER_PORT,
            rate_limit_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            max_batch_messages: MAX_BATCH_MESSAGES,
        }
    }
}

impl ServerConfig {
    /// `PORT` wins over `CA_SENTRY_PORT` so hosted platforms can inject it
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("CA_SENTRY_HOST") {
            config.host = host;
        }
        if let Some(port) = env_parse::<u16>("PORT")? {
            config.port = port;
        } else if let Some(port) = env_parse::<u16>("CA_SENTRY_PORT")? {
            config.port = port;
        }
        if let Some(requests) = env_parse::<u32>("CA_SENTRY_RATE_LIMIT")? {
            config.rate_limit_requests = requests;
        }
        if let Some(secs) = env_parse::<u64>("CA_SENTRY_RATE_WINDOW_SECS")? {
            config.rate_limit_window = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> AppResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::invalid_config(format!("{} has an invalid value: {}", key, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache_prune_threshold, 1000);
    }

    #[test]
    fn test_rejects_inverted_entropy_thresholds() {
        let config = ScannerConfig {
            min_entropy_suffix: 4.5,
            ..ScannerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{"label_bonus": 0.75, "cache_ttl_secs": 60}"#).unwrap();
        assert_eq!(config.label_bonus, 0.75);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.priorities.strict, 10.0);
    }
}
