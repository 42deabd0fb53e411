//! Request gates applied around the API routes.
//!
//! - [`csrf::issue_csrf_cookie`] -- resolves the CSRF token for every request.
//! - [`auth::require_auth`] -- requires a live session cookie.
//! - [`csrf::require_csrf`] -- double-submit check for unsafe methods.
//! - [`rate_limit::limit_login_attempts`] -- per-IP login throttling.

pub mod auth;
pub mod csrf;
pub mod rate_limit;
