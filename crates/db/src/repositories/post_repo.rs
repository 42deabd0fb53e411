//! Repository for the `posts` table and its category links.

use folio_core::types::DbId;
use sqlx::PgPool;

use super::whitelisted_column;
use crate::models::listing::ListQuery;
use crate::models::post::{Post, SavePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, excerpt, content, status, featured_image_id, \
                       published_at, created_at, updated_at";

/// Shared `WHERE` clause for list and count: `$1` status, `$2` search pattern.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR status = $1)
                           AND ($2::TEXT IS NULL
                                OR title ILIKE $2 OR content ILIKE $2 OR slug ILIKE $2)";

/// API sort keys and the columns they order by.
const SORT_COLUMNS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("publishedAt", "published_at"),
    ("title", "title"),
    ("slug", "slug"),
];

/// Provides CRUD operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Resolve an API sort key (e.g. `createdAt`) to a column name.
    pub fn sort_column(key: &str) -> Option<&'static str> {
        whitelisted_column(SORT_COLUMNS, key)
    }

    /// Insert a new post with an already-resolved slug, filing it under
    /// `input.category_ids` in the same transaction.
    pub async fn create(pool: &PgPool, input: &SavePost, slug: &str) -> Result<Post, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO posts (title, slug, excerpt, content, status, featured_image_id, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.featured_image_id)
            .bind(input.published_at)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(category_ids) = &input.category_ids {
            Self::set_categories_inner(&mut tx, post.id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of posts matching the filter.
    pub async fn list(pool: &PgPool, params: &ListQuery) -> Result<Vec<Post>, sqlx::Error> {
        let dir = params.sort_dir.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE {LIST_FILTER}
             ORDER BY {} {dir}, id {dir}
             LIMIT $3 OFFSET $4",
            params.sort_column
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(params.status.map(|s| s.as_str()))
            .bind(params.search_pattern())
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Total number of posts matching the filter (ignores paging).
    pub async fn count(pool: &PgPool, params: &ListQuery) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM posts WHERE {LIST_FILTER}");
        let (total,): (i64,) = sqlx::query_as(&query)
            .bind(params.status.map(|s| s.as_str()))
            .bind(params.search_pattern())
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// The `limit` most recently updated posts.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Post>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM posts ORDER BY updated_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Replace a post's fields, slug and (when given) categories in one
    /// transaction. Returns `None` if the post is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SavePost,
        slug: &str,
    ) -> Result<Option<Post>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE posts SET
                title = $2,
                slug = $3,
                excerpt = $4,
                content = $5,
                status = $6,
                featured_image_id = $7,
                published_at = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.featured_image_id)
            .bind(input.published_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(post) = post else {
            return Ok(None);
        };
        if let Some(category_ids) = &input.category_ids {
            Self::set_categories_inner(&mut tx, post.id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(post))
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(post_id, category_id)` links for the given posts, ordered by post.
    pub async fn category_links(
        pool: &PgPool,
        post_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT post_id, category_id FROM post_categories
             WHERE post_id = ANY($1)
             ORDER BY post_id, category_id",
        )
        .bind(post_ids)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace a post's category links within an open transaction.
    ///
    /// Unknown category ids are ignored.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        post_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id)
             SELECT $1, c.id FROM categories c WHERE c.id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
