//! Handlers for role management (`/roles`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::role::SaveRole;
use folio_db::repositories::RoleRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RoleInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<RoleInput> for SaveRole {
    fn from(input: RoleInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            permissions: input.permissions,
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Role", id })
}

fn duplicate_name() -> AppError {
    AppError::Core(CoreError::Conflict {
        code: "DUPLICATE_NAME",
        message: "A role with this name already exists".to_string(),
    })
}

/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(roles)))
}

/// GET /api/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(role)))
}

/// POST /api/roles
pub async fn create_role(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> AppResult<impl IntoResponse> {
    if RoleRepo::find_by_name(&state.pool, &input.name).await?.is_some() {
        return Err(duplicate_name());
    }

    let role = RoleRepo::create(&state.pool, &SaveRole::from(input)).await?;

    tracing::info!(role_id = role.id, name = %role.name, user_id = auth.user_id, "Role created");

    Ok(Json(DataResponse::new(role)))
}

/// PUT /api/roles/{id}
pub async fn update_role(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> AppResult<impl IntoResponse> {
    let existing = RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if input.name != existing.name
        && RoleRepo::find_by_name(&state.pool, &input.name)
            .await?
            .is_some()
    {
        return Err(duplicate_name());
    }

    let role = RoleRepo::update(&state.pool, id, &SaveRole::from(input))
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(role_id = id, user_id = auth.user_id, "Role updated");

    Ok(Json(DataResponse::new(role)))
}

/// DELETE /api/roles/{id}
pub async fn delete_role(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RoleRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(role_id = id, user_id = auth.user_id, "Role deleted");

    Ok(Json(SuccessResponse::ok()))
}
