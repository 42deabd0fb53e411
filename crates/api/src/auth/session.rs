//! Opaque session tokens and their configuration.
//!
//! The raw token is a random hex string that only ever lives in the client's
//! HTTP-only cookie. The server persists the HMAC-SHA256 of it keyed by the
//! session secret, so a database leak does not expose usable cookies.

use chrono::{Duration, Utc};
use folio_core::tokens::{random_token, sign_token, SESSION_TOKEN_BYTES};
use folio_core::types::Timestamp;

/// Placeholder secret used when `SESSION_SECRET` is unset.
pub const DEV_SESSION_SECRET: &str = "change-me";

/// Configuration for session and CSRF cookies.
#[derive(Clone)]
pub struct SessionConfig {
    /// HMAC key for session token digests.
    pub secret: String,
    /// Session lifetime in hours (default: 24).
    pub ttl_hours: i64,
    /// Name of the HTTP-only session cookie (default: `cms_session`).
    pub cookie_name: String,
    /// Name of the script-readable CSRF cookie (default: `cms_csrf`).
    pub csrf_cookie_name: String,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("ttl_hours", &self.ttl_hours)
            .field("cookie_name", &self.cookie_name)
            .field("csrf_cookie_name", &self.csrf_cookie_name)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var             | Default       |
    /// |---------------------|---------------|
    /// | `SESSION_SECRET`    | `change-me`   |
    /// | `SESSION_TTL_HOURS` | `24`          |
    /// | `COOKIE_NAME`       | `cms_session` |
    /// | `CSRF_COOKIE_NAME`  | `cms_csrf`    |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_TTL_HOURS` is not a positive integer, or if
    /// `production` is set and the secret is empty or the placeholder.
    pub fn from_env(production: bool) -> Self {
        let secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| DEV_SESSION_SECRET.into());
        if production {
            assert!(
                !secret.is_empty() && secret != DEV_SESSION_SECRET,
                "SESSION_SECRET must be set to a real secret in production"
            );
        } else if secret == DEV_SESSION_SECRET {
            tracing::warn!("SESSION_SECRET is not set, using the development placeholder");
        }

        let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");
        assert!(ttl_hours > 0, "SESSION_TTL_HOURS must be positive");

        Self {
            secret,
            ttl_hours,
            cookie_name: std::env::var("COOKIE_NAME").unwrap_or_else(|_| "cms_session".into()),
            csrf_cookie_name: std::env::var("CSRF_COOKIE_NAME")
                .unwrap_or_else(|_| "cms_csrf".into()),
            secure_cookies: production,
        }
    }
}

/// A freshly minted session token.
#[derive(Debug)]
pub struct IssuedSession {
    /// Value for the client cookie. Never persisted.
    pub raw_token: String,
    /// Digest stored in `sessions.token_hash`.
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Generate a new random session token and its digest.
pub fn issue_session_token(config: &SessionConfig) -> IssuedSession {
    let raw_token = random_token(SESSION_TOKEN_BYTES);
    let token_hash = hash_session_token(config, &raw_token);
    IssuedSession {
        raw_token,
        token_hash,
        expires_at: Utc::now() + Duration::hours(config.ttl_hours),
    }
}

/// Digest of a raw cookie value, as stored in the `sessions` table.
pub fn hash_session_token(config: &SessionConfig, raw_token: &str) -> String {
    sign_token(&config.secret, raw_token)
}
