//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;
use crate::models::types::{AddressCandidate, AddressKind, Classification};
use crate::telemetry::TelemetryStats;
use crate::utils::cache::CacheStats;

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "API_RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
        }
    }
}

// ============================================
// Health & Stats
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub telemetry: TelemetryStats,
    pub cache: CacheStats,
    pub validations_computed: u64,
    pub uptime_seconds: u64,
}

// ============================================
// Scan
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub text: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanData {
    /// Presumptive contract address (top candidate)
    pub contract_address: Option<String>,
    pub candidates: Vec<AddressCandidate>,
}

impl From<Vec<AddressCandidate>> for ScanData {
    fn from(candidates: Vec<AddressCandidate>) -> Self {
        Self {
            contract_address: candidates.first().map(|c| c.address.clone()),
            candidates,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchScanRequest {
    pub messages: Vec<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchScanData {
    pub results: Vec<ScanData>,
    pub messages_with_candidates: usize,
}

// ============================================
// Validate
// ============================================

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateData {
    pub address: String,
    pub is_valid: bool,
    pub classification: Classification,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AddressKind>,
}

// ============================================
// Extract
// ============================================

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}
