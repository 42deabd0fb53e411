use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::middleware::rate_limit::limit_login_attempts;
use crate::state::AppState;

/// Routes reachable without a session.
///
/// ```text
/// POST   /auth/login                  -> login (rate limited per client IP)
/// ```
pub fn public_router(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/auth/login",
        post(auth::login).layer(from_fn_with_state(state, limit_login_attempts)),
    )
}

/// Session routes; mounted behind the auth and CSRF gates.
///
/// ```text
/// POST   /auth/logout                 -> logout
/// GET    /auth/me                     -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}
