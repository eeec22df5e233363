//! CA Sentry HTTP API
//! REST endpoints for scanning chat messages for contract addresses

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use middleware::{start_cleanup_task, RateLimiter};
pub use routes::create_router;
pub use types::*;
