//! CA Sentry API Server
//!
//! REST API for scanning chat messages for Solana contract addresses
//!
//! Usage:
//!   cargo run --bin ca_sentry_api
//!
//! Environment:
//!   PORT / CA_SENTRY_PORT - Server port (default: 8080)
//!   CA_SENTRY_HOST        - Server host (default: 0.0.0.0)
//!   CA_SENTRY_CONFIG      - Optional JSON scanner config file
//!   RUST_LOG              - Log filter (default: info)

use ca_sentry::api::{create_router, start_cleanup_task, AppState};
use ca_sentry::utils::constants::{APP_NAME, APP_VERSION};
use ca_sentry::{ScannerConfig, ServerConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let scanner_config = match std::env::var("CA_SENTRY_CONFIG") {
        Ok(path) => {
            info!("📄 Loading scanner config from {}", path);
            ScannerConfig::from_json_file(&path)?
        }
        Err(_) => ScannerConfig::from_env()?,
    };
    let server_config = ServerConfig::from_env()?;
    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port).parse()?;

    let state = Arc::new(AppState::new(scanner_config, server_config)?);
    let telemetry = state.telemetry.clone();

    start_cleanup_task(state.clone());
    info!("🧹 Background cleanup task started");

    let app = create_router(state);

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /v1/scan          - Ranked contract-address candidates");
    info!("  POST /v1/scan/batch    - Batch scan (up to 100 messages)");
    info!("  POST /v1/validate      - Heuristic address validation");
    info!("  POST /v1/extract       - Candidates plus links, images, tickers");
    info!("  GET  /v1/stats         - Scan statistics");
    info!("  GET  /v1/health        - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, exporting telemetry...");
    let stats = telemetry.get_stats();
    info!("   {}", stats.summary());

    match telemetry.export_stats_json(Path::new("telemetry")) {
        Ok(path) => info!("   Stats exported to: {}", path.display()),
        Err(e) => warn!("   Failed to export stats: {}", e),
    }

    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}
