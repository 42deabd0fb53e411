//! Cookie-session authentication.
//!
//! [`require_auth`] resolves the session cookie to a user and stores an
//! [`AuthUser`] in the request extensions; handlers pick it up with the
//! [`AuthUser`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::repositories::SessionRepo;

use crate::auth::session::hash_session_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Identity of the user behind the request's session cookie.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub name: String,
    pub session_id: DbId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })
    }
}

/// Middleware rejecting requests without a live session.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, &jar).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, jar: &CookieJar) -> AppResult<AuthUser> {
    let config = &state.config.session;
    let raw_token = jar
        .get(&config.cookie_name)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })?;

    let token_hash = hash_session_token(config, raw_token);
    let identity = SessionRepo::find_identity_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Core(CoreError::SessionExpired))?;

    if identity.expires_at <= Utc::now() || !identity.is_active {
        // Best effort: the request fails either way.
        if let Err(e) = SessionRepo::delete(&state.pool, identity.session_id).await {
            tracing::warn!(
                error = %e,
                session_id = identity.session_id,
                "Failed to delete stale session"
            );
        }
        return Err(AppError::Core(CoreError::SessionExpired));
    }

    Ok(AuthUser {
        user_id: identity.user_id,
        email: identity.email,
        name: identity.name,
        session_id: identity.session_id,
    })
}
