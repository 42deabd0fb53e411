//! Handlers for the `/pages` resource.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use folio_core::content::{resolve_published_at, PublishStatus};
use folio_core::error::CoreError;
use folio_core::pagination::PageMeta;
use folio_core::slug::{base_slug, SlugKind};
use folio_core::types::{DbId, Timestamp};
use folio_db::models::media::Media;
use folio_db::models::page::{Page, SavePage};
use folio_db::repositories::{MediaRepo, PageRepo};
use folio_db::slug::write_with_unique_slug;
use folio_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::handlers::media::ensure_media_exists;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Body of `POST /pages` and `PUT /pages/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
    pub featured_image_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(flatten)]
    pub page: Page,
    pub featured_image: Option<Media>,
}

impl PageInput {
    fn into_save(self, existing_published_at: Option<Timestamp>) -> SavePage {
        SavePage {
            published_at: resolve_published_at(self.status, existing_published_at, Utc::now()),
            title: self.title,
            content: self.content,
            status: self.status,
            featured_image_id: self.featured_image_id,
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Page", id })
}

pub(crate) async fn with_featured_images(
    pool: &DbPool,
    pages: Vec<Page>,
) -> AppResult<Vec<PageResponse>> {
    let image_ids: Vec<DbId> = pages.iter().filter_map(|p| p.featured_image_id).collect();
    let images: HashMap<DbId, Media> = MediaRepo::find_by_ids(pool, &image_ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    Ok(pages
        .into_iter()
        .map(|page| PageResponse {
            featured_image: page
                .featured_image_id
                .and_then(|id| images.get(&id).cloned()),
            page,
        })
        .collect())
}

async fn single(pool: &DbPool, page: Page) -> AppResult<PageResponse> {
    let id = page.id;
    with_featured_images(pool, vec![page])
        .await?
        .pop()
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/pages
pub async fn list_pages(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_list_query(PageRepo::sort_column)?;

    let (pages, total) = tokio::try_join!(
        PageRepo::list(&state.pool, &query),
        PageRepo::count(&state.pool, &query),
    )?;
    let data = with_featured_images(&state.pool, pages).await?;

    Ok(Json(DataResponse::paged(
        data,
        PageMeta::new(query.page, query.limit, total),
    )))
}

/// GET /api/pages/{id}
pub async fn get_page(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(single(&state.pool, page).await?)))
}

/// POST /api/pages
pub async fn create_page(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> AppResult<impl IntoResponse> {
    ensure_media_exists(&state.pool, input.featured_image_id).await?;

    let base = base_slug(SlugKind::Page, input.slug.as_deref(), &input.title);
    let save = input.into_save(None);

    let pool = &state.pool;
    let save = &save;
    let page = write_with_unique_slug(pool, SlugKind::Page, &base, None, |slug| async move {
        PageRepo::create(pool, save, &slug).await
    })
    .await?;

    tracing::info!(page_id = page.id, slug = %page.slug, user_id = auth.user_id, "Page created");

    Ok(Json(DataResponse::new(single(pool, page).await?)))
}

/// PUT /api/pages/{id}
pub async fn update_page(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<PageInput>,
) -> AppResult<impl IntoResponse> {
    let existing = PageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_media_exists(&state.pool, input.featured_image_id).await?;

    let requested = input
        .slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&existing.slug);
    let base = base_slug(SlugKind::Page, Some(requested), &input.title);
    let save = input.into_save(existing.published_at);

    let pool = &state.pool;
    let save = &save;
    let page = write_with_unique_slug(pool, SlugKind::Page, &base, Some(id), |slug| async move {
        PageRepo::update(pool, id, save, &slug).await
    })
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(page_id = id, slug = %page.slug, user_id = auth.user_id, "Page updated");

    Ok(Json(DataResponse::new(single(pool, page).await?)))
}

/// DELETE /api/pages/{id}
pub async fn delete_page(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PageRepo::delete(&state.pool, id).await?;

    tracing::info!(page_id = id, deleted, user_id = auth.user_id, "Page deleted");

    Ok(Json(SuccessResponse::ok()))
}
