//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so that discarded candidates
//! and rejected requests can be traced in logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - SCAN_xxx: scanner / validator errors
//! - CFG_xxx: configuration errors
//! - API_xxx: API errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Scanner Errors
    // ============================================
    /// A pattern table could not be compiled
    ScanPatternCompile,
    /// A context window fell outside the text or off a char boundary
    ScanWindowOutOfBounds,
    /// Input text was rejected (batch too large, empty request, ...)
    ScanInvalidInput,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Config file could not be read or parsed
    ConfigFileError,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// No route for the requested path
    ApiNotFound,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScanPatternCompile => "SCAN_PATTERN_COMPILE",
            Self::ScanWindowOutOfBounds => "SCAN_WINDOW_OUT_OF_BOUNDS",
            Self::ScanInvalidInput => "SCAN_INVALID_INPUT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigFileError => "CFG_FILE_ERROR",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ScanInvalidInput | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound => 404,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }

    /// Per-candidate errors are dropped by the scanner, everything else surfaces
    pub fn is_candidate_local(&self) -> bool {
        matches!(self, Self::ScanWindowOutOfBounds)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Pattern compilation failed
    pub fn pattern_compile(name: &str, source: regex::Error) -> Self {
        Self::with_source(
            ErrorCode::ScanPatternCompile,
            format!("Failed to compile pattern '{}'", name),
            source,
        )
    }

    /// Context window could not be sliced
    pub fn window_out_of_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::new(
            ErrorCode::ScanWindowOutOfBounds,
            format!("Window {}..{} is not a valid slice of {} bytes", start, end, len),
        )
    }

    /// Invalid scan input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScanInvalidInput, msg)
    }

    /// Invalid config value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API route not found
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorCode::ApiNotFound, format!("No route for {}", path))
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ConfigFileError, "JSON parse error", err)
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        Self::with_source(ErrorCode::ScanPatternCompile, "Regex compile error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::window_out_of_bounds(3, 9, 5);
        assert_eq!(err.code, ErrorCode::ScanWindowOutOfBounds);
        assert_eq!(err.code_str(), "SCAN_WINDOW_OUT_OF_BOUNDS");
        assert!(err.to_string().starts_with("[SCAN_WINDOW_OUT_OF_BOUNDS]"));
    }

    #[test]
    fn test_candidate_local() {
        assert!(ErrorCode::ScanWindowOutOfBounds.is_candidate_local());
        assert!(!ErrorCode::ScanInvalidInput.is_candidate_local());
        assert!(!ErrorCode::ScanPatternCompile.is_candidate_local());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::ScanInvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(AppError::not_found("/v2/scan").code.http_status(), 404);
        assert_eq!(ErrorCode::ScanPatternCompile.http_status(), 500);
    }

    #[test]
    fn test_regex_error_conversion() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err: AppError = bad.into();
        assert_eq!(err.code, ErrorCode::ScanPatternCompile);
        assert!(std::error::Error::source(&err).is_some());
    }
}
