use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::LoginRateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-IP login attempt counters.
    pub login_limiter: Arc<LoginRateLimiter>,
}

impl AppState {
    pub fn new(pool: folio_db::DbPool, config: ServerConfig) -> Self {
        let login_limiter = Arc::new(LoginRateLimiter::new(
            config.login_rate_limit_max,
            std::time::Duration::from_secs(config.login_rate_limit_window_secs),
        ));
        Self {
            pool,
            config: Arc::new(config),
            login_limiter,
        }
    }
}
