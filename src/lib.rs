//! CA Sentry Library
//!
//! Heuristic Solana contract-address scanner for chat messages:
//! - Base58 candidate extraction (strict, loose, meme-suffix, anchored)
//! - Shape and entropy validation with a TTL cache
//! - Context-aware ranking (trading, price, token, social, technical cues)
//! - Message metadata (links, images, tickers)

pub mod api;
pub mod core;
pub mod models;
pub mod telemetry;
pub mod utils;

pub use crate::core::{AddressCandidateScanner, AddressValidator, MessageMetadataExtractor};
pub use models::config::{ScannerConfig, ServerConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AddressCandidate, AddressKind, Classification, MessageMetadata, PatternKind, ScoreBreakdown,
};
pub use telemetry::{ScanTelemetry, TelemetryStats};
pub use utils::cache::{CacheStats, Clock, ManualClock, SystemClock, ValidationCache};
