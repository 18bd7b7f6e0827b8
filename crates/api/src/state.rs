use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gatehouse_db::DbPool,
    /// Server configuration (signing secret, environment, timeouts).
    pub config: Arc<ServerConfig>,
    /// Process-wide fixed-window rate-limit counters.
    pub rate_limiter: Arc<RateLimiter>,
}
