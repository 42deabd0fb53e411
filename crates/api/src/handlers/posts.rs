//! Handlers for the `/posts` resource.
//!
//! Posts carry an optional featured image and a set of categories; both are
//! embedded in every response. Slugs are assigned through
//! [`write_with_unique_slug`], so concurrent writers never share one.

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
use folio_db::models::post::{Post, SavePost};
use folio_db::repositories::{MediaRepo, PostRepo};
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

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /posts` and `PUT /posts/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
    pub featured_image_id: Option<DbId>,
    /// Replaces the post's categories when present; left alone when absent.
    pub category_ids: Option<Vec<DbId>>,
}

/// A post with its featured image and category ids resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub featured_image: Option<Media>,
    pub category_ids: Vec<DbId>,
}

impl PostInput {
    fn into_save(self, existing_published_at: Option<Timestamp>) -> SavePost {
        SavePost {
            published_at: resolve_published_at(self.status, existing_published_at, Utc::now()),
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            status: self.status,
            featured_image_id: self.featured_image_id,
            category_ids: self.category_ids,
        }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Post", id })
}

/// Attach featured images and category ids to a batch of posts.
pub(crate) async fn with_relations(
    pool: &DbPool,
    posts: Vec<Post>,
) -> AppResult<Vec<PostResponse>> {
    let image_ids: Vec<DbId> = posts.iter().filter_map(|p| p.featured_image_id).collect();
    let post_ids: Vec<DbId> = posts.iter().map(|p| p.id).collect();

    let images: HashMap<DbId, Media> = MediaRepo::find_by_ids(pool, &image_ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut categories: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (post_id, category_id) in PostRepo::category_links(pool, &post_ids).await? {
        categories.entry(post_id).or_default().push(category_id);
    }

    Ok(posts
        .into_iter()
        .map(|post| PostResponse {
            featured_image: post
                .featured_image_id
                .and_then(|id| images.get(&id).cloned()),
            category_ids: categories.remove(&post.id).unwrap_or_default(),
            post,
        })
        .collect())
}

async fn single(pool: &DbPool, post: Post) -> AppResult<PostResponse> {
    let id = post.id;
    with_relations(pool, vec![post])
        .await?
        .pop()
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_list_query(PostRepo::sort_column)?;

    let (posts, total) = tokio::try_join!(
        PostRepo::list(&state.pool, &query),
        PostRepo::count(&state.pool, &query),
    )?;
    let data = with_relations(&state.pool, posts).await?;

    Ok(Json(DataResponse::paged(
        data,
        PageMeta::new(query.page, query.limit, total),
    )))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(single(&state.pool, post).await?)))
}

/// POST /api/posts
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PostInput>,
) -> AppResult<impl IntoResponse> {
    ensure_media_exists(&state.pool, input.featured_image_id).await?;

    let base = base_slug(SlugKind::Post, input.slug.as_deref(), &input.title);
    let save = input.into_save(None);

    let pool = &state.pool;
    let save = &save;
    let post = write_with_unique_slug(pool, SlugKind::Post, &base, None, |slug| async move {
        PostRepo::create(pool, save, &slug).await
    })
    .await?;

    tracing::info!(post_id = post.id, slug = %post.slug, user_id = auth.user_id, "Post created");

    Ok(Json(DataResponse::new(single(pool, post).await?)))
}

/// PUT /api/posts/{id}
///
/// Without a `slug` in the body the current slug is kept unless another
/// post has since taken it.
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<PostInput>,
) -> AppResult<impl IntoResponse> {
    let existing = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ensure_media_exists(&state.pool, input.featured_image_id).await?;

    let requested = input
        .slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&existing.slug);
    let base = base_slug(SlugKind::Post, Some(requested), &input.title);
    let save = input.into_save(existing.published_at);

    let pool = &state.pool;
    let save = &save;
    let post = write_with_unique_slug(pool, SlugKind::Post, &base, Some(id), |slug| async move {
        PostRepo::update(pool, id, save, &slug).await
    })
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(post_id = id, slug = %post.slug, user_id = auth.user_id, "Post updated");

    Ok(Json(DataResponse::new(single(pool, post).await?)))
}

/// DELETE /api/posts/{id}
///
/// Succeeds whether or not the post existed.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PostRepo::delete(&state.pool, id).await?;

    tracing::info!(post_id = id, deleted, user_id = auth.user_id, "Post deleted");

    Ok(Json(SuccessResponse::ok()))
}
