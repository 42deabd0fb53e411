//! Builders for the session and CSRF cookies.

use axum_extra::extract::cookie::{Cookie, SameSite};
use folio_core::types::Timestamp;

use super::session::SessionConfig;

fn to_cookie_time(ts: Timestamp) -> Option<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp(ts.timestamp()).ok()
}

/// HTTP-only session cookie expiring with the session.
pub fn session_cookie(
    config: &SessionConfig,
    raw_token: String,
    expires_at: Timestamp,
) -> Cookie<'static> {
    let mut builder = Cookie::build((config.cookie_name.clone(), raw_token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .path("/");
    if let Some(expires) = to_cookie_time(expires_at) {
        builder = builder.expires(expires);
    }
    builder.build()
}

/// Removal cookie for the session. Path must match the one it was set with.
pub fn clear_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .build()
}

/// Script-readable CSRF cookie mirrored by clients into `x-csrf-token`.
pub fn csrf_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.csrf_cookie_name.clone(), token))
        .http_only(false)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .path("/")
        .build()
}
