//! Core Module - Address Heuristics
//!
//! Extraction patterns, validation, scoring and the scanner that ties them
//! together.

pub mod clues;
pub mod message;
pub mod patterns;
pub mod scanner;
pub mod scoring;
pub mod validator;
pub mod window;

pub use clues::ContextClueExtractor;
pub use message::MessageMetadataExtractor;
pub use patterns::{ExtractionPatterns, RawMatch};
pub use scanner::AddressCandidateScanner;
pub use scoring::{composite, length_score, shannon_entropy, ContextScore, ContextScorer, KeywordCategory};
pub use validator::{evaluate, AddressValidator, Rejection};
