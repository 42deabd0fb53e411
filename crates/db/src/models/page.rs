//! Static page model and DTOs.

use folio_core::content::PublishStatus;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub featured_image_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct SavePage {
    pub title: String,
    pub content: String,
    pub status: PublishStatus,
    pub featured_image_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
}
