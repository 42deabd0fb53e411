//! Repository for the `media` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::media::{CreateMedia, Media, UpdateMediaMetadata};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, filename, original_name, title, caption, description, alt_text, \
                       mime_type, size, width, height, path, url, created_at, updated_at";

/// Provides CRUD operations for media items.
pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media (filename, original_name, mime_type, size, width, height, path, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&input.filename)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(input.size)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.path)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several media items at once (for featured images on list pages).
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Media>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = ANY($1)");
        sqlx::query_as::<_, Media>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List the whole library, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Media>(&query).fetch_all(pool).await
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media")
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Replace the descriptive metadata. Blank strings are stored as NULL.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMediaMetadata,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET
                title = NULLIF(BTRIM($2), ''),
                alt_text = NULLIF(BTRIM($3), ''),
                caption = NULLIF(BTRIM($4), ''),
                description = NULLIF(BTRIM($5), '')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.alt_text)
            .bind(&input.caption)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Whether a post or a page uses this item as its featured image.
    pub async fn is_in_use(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (used,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE featured_image_id = $1)
                 OR EXISTS(SELECT 1 FROM pages WHERE featured_image_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(used)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
