//! Collision-free slug assignment for posts, pages and categories.
//!
//! Candidates are probed in order (`base`, `base-2`, `base-3`, ...) and the
//! first free one is handed to the caller's write. The probe alone cannot
//! stop two concurrent writers from picking the same candidate, so each
//! table also carries a unique constraint: when the write is rejected by
//! that constraint the search resumes from the next suffix. The number of
//! candidates tried is bounded by [`MAX_SLUG_ATTEMPTS`].

use std::future::Future;

use folio_core::slug::{candidate, SlugKind, MAX_SLUG_ATTEMPTS};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum SlugError {
    #[error("No free slug derived from '{base}' after {attempts} attempts")]
    Exhausted { base: String, attempts: u32 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn table_name(kind: SlugKind) -> &'static str {
    match kind {
        SlugKind::Post => "posts",
        SlugKind::Page => "pages",
        SlugKind::Category => "categories",
    }
}

/// Name of the unique constraint guarding `slug` in the kind's table.
pub fn slug_constraint(kind: SlugKind) -> &'static str {
    match kind {
        SlugKind::Post => "uq_posts_slug",
        SlugKind::Page => "uq_pages_slug",
        SlugKind::Category => "uq_categories_slug",
    }
}

/// Whether any row other than `exclude_id` already uses `slug`.
pub async fn slug_taken(
    pool: &PgPool,
    kind: SlugKind,
    slug: &str,
    exclude_id: Option<DbId>,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "SELECT EXISTS(
             SELECT 1 FROM {} WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
         )",
        table_name(kind)
    );
    let (taken,): (bool,) = sqlx::query_as(&query)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

/// First candidate at or after `start` that no other row uses.
async fn first_free_from(
    pool: &PgPool,
    kind: SlugKind,
    base: &str,
    start: u32,
    exclude_id: Option<DbId>,
) -> Result<Option<(u32, String)>, sqlx::Error> {
    for attempt in start..=MAX_SLUG_ATTEMPTS {
        let slug = candidate(base, attempt);
        if !slug_taken(pool, kind, &slug, exclude_id).await? {
            return Ok(Some((attempt, slug)));
        }
    }
    Ok(None)
}

/// Probe for a free slug without writing anything.
pub async fn resolve_unique_slug(
    pool: &PgPool,
    kind: SlugKind,
    base: &str,
    exclude_id: Option<DbId>,
) -> Result<String, SlugError> {
    first_free_from(pool, kind, base, 1, exclude_id)
        .await?
        .map(|(_, slug)| slug)
        .ok_or_else(|| SlugError::Exhausted {
            base: base.to_string(),
            attempts: MAX_SLUG_ATTEMPTS,
        })
}

/// Run `write` with the first free slug derived from `base`, retrying with
/// the next suffix whenever the write loses a race on the slug constraint.
///
/// `exclude_id` is the id of the record being updated, if any, so that a
/// record never collides with itself.
pub async fn write_with_unique_slug<T, F, Fut>(
    pool: &PgPool,
    kind: SlugKind,
    base: &str,
    exclude_id: Option<DbId>,
    mut write: F,
) -> Result<T, SlugError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let constraint = slug_constraint(kind);
    let mut start = 1;

    while let Some((attempt, slug)) = first_free_from(pool, kind, base, start, exclude_id).await? {
        match write(slug.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) if is_unique_violation(&err, constraint) => {
                tracing::warn!(
                    table = table_name(kind),
                    slug = %slug,
                    "Slug claimed by a concurrent write, trying next suffix"
                );
                start = attempt + 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(SlugError::Exhausted {
        base: base.to_string(),
        attempts: MAX_SLUG_ATTEMPTS,
    })
}
