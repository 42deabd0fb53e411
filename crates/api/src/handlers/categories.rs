//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::pagination::PageMeta;
use folio_core::slug::{base_slug, SlugKind};
use folio_core::types::DbId;
use folio_db::models::category::SaveCategory;
use folio_db::repositories::CategoryRepo;
use folio_db::slug::write_with_unique_slug;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// GET /api/categories
///
/// `status` is accepted but has no effect on categories.
pub async fn list_categories(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let mut query = params.into_list_query(CategoryRepo::sort_column)?;
    query.status = None;

    let (categories, total) = tokio::try_join!(
        CategoryRepo::list(&state.pool, &query),
        CategoryRepo::count(&state.pool, &query),
    )?;

    Ok(Json(DataResponse::paged(
        categories,
        PageMeta::new(query.page, query.limit, total),
    )))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(category)))
}

/// POST /api/categories
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> AppResult<impl IntoResponse> {
    let base = base_slug(SlugKind::Category, input.slug.as_deref(), &input.name);
    let save = SaveCategory {
        name: input.name,
        description: input.description,
    };

    let pool = &state.pool;
    let save = &save;
    let category =
        write_with_unique_slug(pool, SlugKind::Category, &base, None, |slug| async move {
            CategoryRepo::create(pool, save, &slug).await
        })
        .await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        user_id = auth.user_id,
        "Category created"
    );

    Ok(Json(DataResponse::new(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> AppResult<impl IntoResponse> {
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let requested = input
        .slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&existing.slug);
    let base = base_slug(SlugKind::Category, Some(requested), &input.name);
    let save = SaveCategory {
        name: input.name,
        description: input.description,
    };

    let pool = &state.pool;
    let save = &save;
    let category =
        write_with_unique_slug(pool, SlugKind::Category, &base, Some(id), |slug| async move {
            CategoryRepo::update(pool, id, save, &slug).await
        })
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, user_id = auth.user_id, "Category updated");

    Ok(Json(DataResponse::new(category)))
}

/// DELETE /api/categories/{id}
///
/// Succeeds whether or not the category existed.
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CategoryRepo::delete(&state.pool, id).await?;

    tracing::info!(category_id = id, deleted, user_id = auth.user_id, "Category deleted");

    Ok(Json(SuccessResponse::ok()))
}
