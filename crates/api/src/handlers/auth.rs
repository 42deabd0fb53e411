//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::session::CreateSession;
use folio_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookies::{clear_session_cookie, session_cookie};
use crate::auth::password::{verify_dummy_password, verify_password};
use crate::auth::session::{hash_session_token, issue_session_token};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::csrf::CsrfToken;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// The signed-in user as seen by the admin client.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
    pub name: String,
}

/// Body of login and `me`: the user plus the CSRF token to echo back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: SessionUser,
    pub csrf_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Verify email + password, open a session and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    CsrfToken(csrf_token): CsrfToken,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<DataResponse<SessionInfo>>)> {
    let Some(user) = UserRepo::find_by_email(&state.pool, &input.email).await? else {
        verify_dummy_password(&input.password);
        tracing::info!("Rejected login attempt for unknown email");
        return Err(AppError::Core(CoreError::InvalidCredentials));
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid || !user.is_active {
        tracing::info!(user_id = user.id, "Rejected login attempt");
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    let session_config = &state.config.session;
    let issued = issue_session_token(session_config);
    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash: issued.token_hash,
            expires_at: issued.expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, session_id = session.id, "User logged in");

    let jar = jar.add(session_cookie(
        session_config,
        issued.raw_token,
        issued.expires_at,
    ));

    Ok((
        jar,
        Json(DataResponse::new(SessionInfo {
            user: SessionUser {
                id: user.id,
                email: user.email,
                name: user.name,
            },
            csrf_token,
        })),
    ))
}

/// POST /api/auth/logout
///
/// Delete the current session and clear its cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<DataResponse<SuccessResponse>>)> {
    let session_config = &state.config.session;

    if let Some(cookie) = jar.get(&session_config.cookie_name) {
        let token_hash = hash_session_token(session_config, cookie.value());
        SessionRepo::delete_by_token_hash(&state.pool, &token_hash).await?;
    }

    tracing::info!(user_id = auth.user_id, "User logged out");

    let jar = jar.remove(clear_session_cookie(session_config));
    Ok((jar, Json(SuccessResponse::ok())))
}

/// GET /api/auth/me
pub async fn me(
    auth: AuthUser,
    CsrfToken(csrf_token): CsrfToken,
) -> Json<DataResponse<SessionInfo>> {
    Json(DataResponse::new(SessionInfo {
        user: SessionUser {
            id: auth.user_id,
            email: auth.email,
            name: auth.name,
        },
        csrf_token,
    }))
}
