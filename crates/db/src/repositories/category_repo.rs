//! Repository for the `categories` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use super::whitelisted_column;
use crate::models::category::{Category, SaveCategory};
use crate::models::listing::ListQuery;

/// Column list with the derived post count. Aliased as `c`.
const COLUMNS: &str = "c.id, c.name, c.slug, c.description, \
     (SELECT COUNT(*) FROM post_categories pc WHERE pc.category_id = c.id) AS post_count, \
     c.created_at, c.updated_at";

/// Plain column list for `RETURNING` clauses.
const RETURNING: &str = "id, name, slug, description, 0::BIGINT AS post_count, created_at, updated_at";

/// `$1` search pattern.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR c.name ILIKE $1 OR c.slug ILIKE $1)";

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("createdAt", "c.created_at"),
    ("updatedAt", "c.updated_at"),
    ("name", "c.name"),
    ("slug", "c.slug"),
];

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    pub fn sort_column(key: &str) -> Option<&'static str> {
        whitelisted_column(SORT_COLUMNS, key)
    }

    /// Insert a category. A new category has no posts, so `post_count` is 0.
    pub async fn create(
        pool: &PgPool,
        input: &SaveCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {RETURNING}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, params: &ListQuery) -> Result<Vec<Category>, sqlx::Error> {
        let dir = params.sort_dir.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM categories c
             WHERE {LIST_FILTER}
             ORDER BY {} {dir}, c.id {dir}
             LIMIT $2 OFFSET $3",
            params.sort_column
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(params.search_pattern())
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &ListQuery) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM categories c WHERE {LIST_FILTER}");
        let (total,): (i64,) = sqlx::query_as(&query)
            .bind(params.search_pattern())
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Update name, slug and description, then re-read to get the post count.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SaveCategory,
        slug: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET name = $2, slug = $3, description = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(slug)
        .bind(&input.description)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a category. Post links are removed by cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
