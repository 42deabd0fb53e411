//! Integration tests for collision-free slug assignment.

use assert_matches::assert_matches;
use folio_core::content::PublishStatus;
use folio_core::slug::SlugKind;
use folio_db::models::post::SavePost;
use folio_db::repositories::PostRepo;
use folio_db::slug::{resolve_unique_slug, slug_taken, write_with_unique_slug, SlugError};
use sqlx::PgPool;

fn save_post(title: &str) -> SavePost {
    SavePost {
        title: title.to_string(),
        excerpt: None,
        content: String::new(),
        status: PublishStatus::Draft,
        featured_image_id: None,
        published_at: None,
        category_ids: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_free_base_is_used_as_is(pool: PgPool) {
    let slug = resolve_unique_slug(&pool, SlugKind::Post, "hello-world", None)
        .await
        .unwrap();
    assert_eq!(slug, "hello-world");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_taken_slugs_get_numeric_suffix(pool: PgPool) {
    PostRepo::create(&pool, &save_post("Hello"), "hello").await.unwrap();
    PostRepo::create(&pool, &save_post("Hello"), "hello-2").await.unwrap();

    let slug = resolve_unique_slug(&pool, SlugKind::Post, "hello", None)
        .await
        .unwrap();
    assert_eq!(slug, "hello-3");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_record_does_not_collide_with_itself(pool: PgPool) {
    let post = PostRepo::create(&pool, &save_post("Hello"), "hello").await.unwrap();

    assert!(slug_taken(&pool, SlugKind::Post, "hello", None).await.unwrap());
    assert!(!slug_taken(&pool, SlugKind::Post, "hello", Some(post.id)).await.unwrap());

    let slug = resolve_unique_slug(&pool, SlugKind::Post, "hello", Some(post.id))
        .await
        .unwrap();
    assert_eq!(slug, "hello");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_kinds_do_not_share_slugs(pool: PgPool) {
    PostRepo::create(&pool, &save_post("About"), "about").await.unwrap();

    let slug = resolve_unique_slug(&pool, SlugKind::Page, "about", None)
        .await
        .unwrap();
    assert_eq!(slug, "about");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_write_retries_after_losing_race(pool: PgPool) {
    let mut calls = 0;
    let post = write_with_unique_slug(&pool, SlugKind::Post, "hello", None, |slug| {
        calls += 1;
        let first = calls == 1;
        let pool = pool.clone();
        async move {
            if first {
                // Another writer claims the probed slug before our insert lands.
                PostRepo::create(&pool, &save_post("Rival"), &slug).await?;
            }
            PostRepo::create(&pool, &save_post("Hello"), &slug).await
        }
    })
    .await
    .unwrap();

    assert_eq!(calls, 2);
    assert_eq!(post.slug, "hello-2");
    assert_eq!(post.title, "Hello");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_write_errors_are_not_retried(pool: PgPool) {
    let mut calls = 0;
    let result = write_with_unique_slug(&pool, SlugKind::Post, "hello", None, |slug| {
        calls += 1;
        let pool = pool.clone();
        async move {
            let mut input = save_post("Hello");
            input.featured_image_id = Some(999_999);
            PostRepo::create(&pool, &input, &slug).await
        }
    })
    .await;

    assert_eq!(calls, 1);
    assert_matches!(result, Err(SlugError::Database(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exhausted_candidates_are_reported(pool: PgPool) {
    sqlx::query(
        "INSERT INTO categories (name, slug)
         SELECT 'Full', CASE WHEN g = 1 THEN 'full' ELSE 'full-' || g END
         FROM generate_series(1, 100) AS g",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = resolve_unique_slug(&pool, SlugKind::Category, "full", None).await;
    assert_matches!(
        result,
        Err(SlugError::Exhausted { ref base, attempts: 100 }) if base == "full"
    );
}
