//! Type definitions for the address scanner
//! Core data structures shared by the scanner, validator and API

use serde::{Deserialize, Serialize};

/// Best-effort classification of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Token mint
    Mint,
    /// Wallet / owner account
    Wallet,
    /// On-chain program
    Program,
    /// Looks like an address, kind not determined
    Unknown,
}

impl AddressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressKind::Mint => "mint",
            AddressKind::Wallet => "wallet",
            AddressKind::Program => "program",
            AddressKind::Unknown => "unknown",
        }
    }
}

/// Result of validating a candidate string.
///
/// `Unclassified` means the string passed the heuristics but nothing was
/// looked up; it is not the same as `Known(AddressKind::Unknown)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "kind", rename_all = "snake_case")]
pub enum Classification {
    Known(AddressKind),
    Unclassified,
    Invalid,
}

impl Classification {
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Classification::Invalid)
    }

    /// Kind to report on a candidate
    pub fn kind(&self) -> AddressKind {
        match self {
            Classification::Known(kind) => *kind,
            _ => AddressKind::Unknown,
        }
    }

    /// Kind only when it was actually determined
    pub fn known_kind(&self) -> Option<AddressKind> {
        match self {
            Classification::Known(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Extraction pattern that produced an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 43-44 char run, the canonical address length
    Strict,
    /// 32-42 char run
    Loose,
    /// 25+ chars followed by a vanity suffix
    Suffix,
    /// Run right after `/`, `@`, `$` or a `CA:`-style label
    Anchored,
}

impl PatternKind {
    /// Patterns in the order they are run
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Strict,
        PatternKind::Loose,
        PatternKind::Suffix,
        PatternKind::Anchored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Strict => "strict",
            PatternKind::Loose => "loose",
            PatternKind::Suffix => "suffix",
            PatternKind::Anchored => "anchored",
        }
    }
}

/// Individual components of a composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub pattern: PatternKind,
    pub priority: f64,
    pub context: f64,
    pub entropy: f64,
    pub length: f64,
    /// Whether the labeled-prefix bonus was applied
    pub labeled: bool,
}

/// A ranked contract-address guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub address: String,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: AddressKind,
    pub context_clues: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Metadata pulled out of one chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Presumptive contract address (top candidate)
    pub contract_address: Option<String>,
    pub candidates: Vec<AddressCandidate>,
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub tickers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_kind() {
        assert_eq!(Classification::Known(AddressKind::Program).kind(), AddressKind::Program);
        assert_eq!(Classification::Unclassified.kind(), AddressKind::Unknown);
        assert_eq!(Classification::Unclassified.known_kind(), None);
        assert!(!Classification::Invalid.is_valid());
        assert!(Classification::Unclassified.is_valid());
    }

    #[test]
    fn test_candidate_serializes_type_field() {
        let candidate = AddressCandidate {
            address: "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string(),
            score: 5.5,
            kind: AddressKind::Unknown,
            context_clues: vec!["trading".to_string()],
            breakdown: ScoreBreakdown {
                pattern: PatternKind::Strict,
                priority: 10.0,
                context: 1.0,
                entropy: 4.9,
                length: 1.0,
                labeled: false,
            },
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["type"], "unknown");
        assert_eq!(json["breakdown"]["pattern"], "strict");
    }
}
