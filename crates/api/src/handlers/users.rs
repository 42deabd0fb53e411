//! Handlers for admin user management (`/users`).
//!
//! Responses go through [`UserResponse`] so the password hash never leaves
//! the database layer.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::user::{CreateUser, UpdateUser, UserResponse};
use folio_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /users` and `PUT /users/{id}`.
///
/// `password` is required on create and optional on update.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn duplicate_email() -> AppError {
    AppError::Core(CoreError::Conflict {
        code: "DUPLICATE_EMAIL",
        message: "A user with this email already exists".to_string(),
    })
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users: Vec<UserResponse> = UserRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(DataResponse::new(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(UserResponse::from(user))))
}

/// POST /api/users
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> AppResult<impl IntoResponse> {
    let password = input.password.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Password is required for new users".to_string(),
        ))
    })?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(duplicate_email());
    }

    // A concurrent insert still hits uq_users_email and maps to the same 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            password_hash: hash(password)?,
            name: input.name,
            email: input.email,
            role: input.role,
            is_active: input.is_active,
        },
    )
    .await?;

    tracing::info!(new_user_id = user.id, user_id = auth.user_id, "User created");

    Ok(Json(DataResponse::new(UserResponse::from(user))))
}

/// PUT /api/users/{id}
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> AppResult<impl IntoResponse> {
    let existing = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if input.email != existing.email
        && UserRepo::find_by_email(&state.pool, &input.email)
            .await?
            .is_some()
    {
        return Err(duplicate_email());
    }

    let password_hash = input.password.as_deref().map(hash).transpose()?;
    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name: input.name,
            email: input.email,
            role: input.role,
            is_active: input.is_active,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(target_user_id = id, user_id = auth.user_id, "User updated");

    Ok(Json(DataResponse::new(UserResponse::from(user))))
}

/// DELETE /api/users/{id}
///
/// Removes the user's sessions along with the account.
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(target_user_id = id, user_id = auth.user_id, "User deleted");

    Ok(Json(SuccessResponse::ok()))
}
