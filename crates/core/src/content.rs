//! Publish workflow shared by posts and pages.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Lifecycle state of a post or page. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
            PublishStatus::Archived => "archived",
        }
    }
}

/// Compute `published_at` for a write.
///
/// Published records keep their existing timestamp, or get `now` if they
/// never had one. Any other status clears it.
pub fn resolve_published_at(
    status: PublishStatus,
    existing: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match status {
        PublishStatus::Published => Some(existing.unwrap_or(now)),
        PublishStatus::Draft | PublishStatus::Archived => None,
    }
}
