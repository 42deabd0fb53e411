//! Repository for the `pages` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use super::whitelisted_column;
use crate::models::listing::ListQuery;
use crate::models::page::{Page, SavePage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, slug, content, status, featured_image_id, published_at, created_at, updated_at";

/// `$1` status, `$2` search pattern.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR status = $1)
                           AND ($2::TEXT IS NULL
                                OR title ILIKE $2 OR content ILIKE $2 OR slug ILIKE $2)";

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("publishedAt", "published_at"),
    ("title", "title"),
    ("slug", "slug"),
];

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    pub fn sort_column(key: &str) -> Option<&'static str> {
        whitelisted_column(SORT_COLUMNS, key)
    }

    pub async fn create(pool: &PgPool, input: &SavePage, slug: &str) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (title, slug, content, status, featured_image_id, published_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.featured_image_id)
            .bind(input.published_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, params: &ListQuery) -> Result<Vec<Page>, sqlx::Error> {
        let dir = params.sort_dir.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE {LIST_FILTER}
             ORDER BY {} {dir}, id {dir}
             LIMIT $3 OFFSET $4",
            params.sort_column
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(params.status.map(|s| s.as_str()))
            .bind(params.search_pattern())
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &ListQuery) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM pages WHERE {LIST_FILTER}");
        let (total,): (i64,) = sqlx::query_as(&query)
            .bind(params.status.map(|s| s.as_str()))
            .bind(params.search_pattern())
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pages")
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Page>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM pages ORDER BY updated_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SavePage,
        slug: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                title = $2,
                slug = $3,
                content = $4,
                status = $5,
                featured_image_id = $6,
                published_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.featured_image_id)
            .bind(input.published_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
