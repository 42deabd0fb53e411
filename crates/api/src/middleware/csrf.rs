//! Double-submit CSRF protection.
//!
//! Every response carries a script-readable CSRF cookie (issued once per
//! browser). Unsafe requests must echo its value in the `x-csrf-token`
//! header.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use folio_core::error::CoreError;
use folio_core::tokens::{random_token, tokens_match, CSRF_TOKEN_BYTES};

use crate::auth::cookies::csrf_cookie;
use crate::error::AppError;
use crate::state::AppState;

/// Header clients copy the CSRF cookie into.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// The CSRF token in effect for the current request: the browser's existing
/// cookie value, or the one issued with this response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| AppError::InternalError("CSRF token layer is not installed".into()))
    }
}

/// Middleware resolving the request's CSRF token and setting the cookie when
/// the browser does not have one yet.
pub async fn issue_csrf_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config.session;
    let existing = jar
        .get(&config.csrf_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    let (token, fresh) = match existing {
        Some(token) => (token, false),
        None => (random_token(CSRF_TOKEN_BYTES), true),
    };
    request.extensions_mut().insert(CsrfToken(token.clone()));

    let response = next.run(request).await;
    if fresh {
        (jar.add(csrf_cookie(config, token)), response).into_response()
    } else {
        response
    }
}

/// Whether a request passes the double-submit check.
///
/// Safe methods always pass. Anything else needs a non-empty cookie and a
/// header with the same value.
pub fn csrf_satisfied(method: &Method, cookie: Option<&str>, header: Option<&str>) -> bool {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return true;
    }
    match (cookie, header) {
        (Some(cookie), Some(header)) if !cookie.is_empty() => tokens_match(cookie, header),
        _ => false,
    }
}

/// Middleware rejecting unsafe requests without a matching CSRF header.
pub async fn require_csrf(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let satisfied = csrf_satisfied(
        request.method(),
        jar.get(&state.config.session.csrf_cookie_name)
            .map(|c| c.value()),
        request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    if !satisfied {
        tracing::debug!(method = %request.method(), path = %request.uri().path(), "CSRF check failed");
        return Err(AppError::Core(CoreError::CsrfMismatch));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_methods_skip_the_check() {
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(csrf_satisfied(&method, None, None));
        }
    }

    #[test]
    fn unsafe_methods_need_matching_pair() {
        assert!(csrf_satisfied(&Method::POST, Some("abc"), Some("abc")));
        assert!(!csrf_satisfied(&Method::POST, Some("abc"), Some("abd")));
        assert!(!csrf_satisfied(&Method::PUT, Some("abc"), None));
        assert!(!csrf_satisfied(&Method::DELETE, None, Some("abc")));
        assert!(!csrf_satisfied(&Method::PATCH, Some(""), Some("")));
    }
}
