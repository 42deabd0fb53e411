//! Media library model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A stored upload from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: DbId,
    pub filename: String,
    pub original_name: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
    pub mime_type: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Filesystem location; internal only.
    #[serde(skip)]
    pub path: String,
    pub url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a freshly stored upload.
#[derive(Debug)]
pub struct CreateMedia {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub path: String,
    pub url: String,
}

/// DTO for editing descriptive metadata. Empty strings are stored as NULL.
#[derive(Debug)]
pub struct UpdateMediaMetadata {
    pub title: String,
    pub alt_text: String,
    pub caption: String,
    pub description: String,
}
