//! Handler for the admin dashboard summary.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_db::repositories::{MediaRepo, PageRepo, PostRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::pages::{with_featured_images, PageResponse};
use crate::handlers::posts::{with_relations, PostResponse};
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of recently updated posts and pages shown on the dashboard.
const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct ContentCounts {
    pub posts: i64,
    pub pages: i64,
    pub media: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentContent {
    pub posts: Vec<PostResponse>,
    pub pages: Vec<PageResponse>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub counts: ContentCounts,
    pub recent: RecentContent,
}

/// GET /api/dashboard/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let (posts, pages, media, recent_posts, recent_pages) = tokio::try_join!(
        PostRepo::count_all(pool),
        PageRepo::count_all(pool),
        MediaRepo::count_all(pool),
        PostRepo::recent(pool, RECENT_LIMIT),
        PageRepo::recent(pool, RECENT_LIMIT),
    )?;

    Ok(Json(DataResponse::new(DashboardSummary {
        counts: ContentCounts {
            posts,
            pages,
            media,
        },
        recent: RecentContent {
            posts: with_relations(pool, recent_posts).await?,
            pages: with_featured_images(pool, recent_pages).await?,
        },
    })))
}
