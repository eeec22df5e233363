//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::{StatusCode, Uri},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::middleware::RateLimiter;
use super::types::*;
use crate::core::{AddressCandidateScanner, MessageMetadataExtractor};
use crate::models::config::{ScannerConfig, ServerConfig};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::MessageMetadata;
use crate::telemetry::ScanTelemetry;
use crate::utils::constants::{APP_VERSION, MAX_RESULTS_LIMIT, MAX_TEXT_BYTES};

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

/// Shared application state
pub struct AppState {
    pub scanner: Arc<AddressCandidateScanner>,
    pub extractor: MessageMetadataExtractor,
    pub telemetry: Arc<ScanTelemetry>,
    pub rate_limiter: RateLimiter,
    pub server: ServerConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(scanner_config: ScannerConfig, server: ServerConfig) -> AppResult<Self> {
        let telemetry = Arc::new(ScanTelemetry::new());
        let scanner = AddressCandidateScanner::new(scanner_config)?.with_telemetry(telemetry.clone());

        Ok(Self {
            scanner: Arc::new(scanner),
            extractor: MessageMetadataExtractor::new()?,
            telemetry,
            rate_limiter: RateLimiter::new(server.rate_limit_requests, server.rate_limit_window),
            server,
            start_time: Instant::now(),
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Requested result count, defaulted and capped
    fn max_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.scanner.config().default_max_results)
            .min(MAX_RESULTS_LIMIT)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: AppError, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(ApiError::from(&err), elapsed_ms(start))))
}

fn check_text(text: &str) -> AppResult<()> {
    if text.len() > MAX_TEXT_BYTES {
        return Err(AppError::invalid_input(format!(
            "Text is {} bytes, limit is {}",
            text.len(),
            MAX_TEXT_BYTES
        )));
    }
    Ok(())
}

// ============================================
// Health & Stats
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let validator = state.scanner.validator();

    let data = StatsData {
        telemetry: state.telemetry.get_stats(),
        cache: validator.cache().stats(),
        validations_computed: validator.validations_computed(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Scan
// ============================================

pub async fn scan_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> ApiResult<ScanData> {
    let start = Instant::now();
    check_text(&req.text).map_err(|e| reject(e, start))?;

    let candidates = state.scanner.scan(&req.text, state.max_results(req.max_results));
    if let Some(top) = candidates.first() {
        info!(
            address = %top.address,
            score = top.score,
            alternates = candidates.len() - 1,
            "🎯 contract address detected"
        );
    }

    Ok(Json(ApiResponse::success(candidates.into(), elapsed_ms(start))))
}

pub async fn batch_scan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchScanRequest>,
) -> ApiResult<BatchScanData> {
    let start = Instant::now();

    if req.messages.is_empty() {
        return Err(reject(AppError::invalid_input("messages must not be empty"), start));
    }
    if req.messages.len() > state.server.max_batch_messages {
        return Err(reject(
            AppError::invalid_input(format!(
                "Batch of {} messages exceeds limit of {}",
                req.messages.len(),
                state.server.max_batch_messages
            )),
            start,
        ));
    }
    for text in &req.messages {
        check_text(text).map_err(|e| reject(e, start))?;
    }

    let max_results = state.max_results(req.max_results);
    let results: Vec<ScanData> = req
        .messages
        .iter()
        .map(|text| state.scanner.scan(text, max_results).into())
        .collect();
    let messages_with_candidates = results
        .iter()
        .filter(|r| r.contract_address.is_some())
        .count();

    info!(
        messages = results.len(),
        with_candidates = messages_with_candidates,
        "📦 batch scan complete"
    );

    Ok(Json(ApiResponse::success(
        BatchScanData {
            results,
            messages_with_candidates,
        },
        elapsed_ms(start),
    )))
}

// ============================================
// Validate
// ============================================

pub async fn validate_address(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> ApiResult<ValidateData> {
    let start = Instant::now();
    let address = req.address.trim().to_string();
    if address.is_empty() {
        return Err(reject(AppError::bad_request("address must not be empty"), start));
    }

    let classification = state.scanner.validate_on_chain(&address);
    let data = ValidateData {
        is_valid: classification.is_valid(),
        kind: classification.is_valid().then(|| classification.kind()),
        classification,
        address,
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Extract
// ============================================

pub async fn extract_metadata(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> ApiResult<MessageMetadata> {
    let start = Instant::now();
    check_text(&req.text).map_err(|e| reject(e, start))?;

    let metadata = state
        .extractor
        .extract(&state.scanner, &req.text, state.max_results(req.max_results));

    Ok(Json(ApiResponse::success(metadata, elapsed_ms(start))))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    reject(AppError::not_found(uri.path()), Instant::now())
}
