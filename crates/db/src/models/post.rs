//! Blog post model and DTOs.

use folio_core::content::PublishStatus;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub featured_image_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Field values written on create and on full update. The slug is supplied
/// separately by the slug writer.
#[derive(Debug)]
pub struct SavePost {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: PublishStatus,
    pub featured_image_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    /// Replaces the post's category links when `Some`; `None` leaves them.
    pub category_ids: Option<Vec<DbId>>,
}
