//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constant tables and the validation cache shared by the scanner.

pub mod cache;
pub mod constants;

pub use cache::*;
pub use constants::*;
