//! Integration tests for the repository layer.
//!
//! - Session lookup, expiry cleanup and cascade on user delete
//! - Unique constraint violations surfaced to callers
//! - Listing filters, search and counts
//! - Derived category post counts and media usage checks

use chrono::{Duration, Utc};
use folio_core::content::PublishStatus;
use folio_core::pagination::SortDirection;
use folio_db::is_unique_violation;
use folio_db::models::category::SaveCategory;
use folio_db::models::listing::ListQuery;
use folio_db::models::media::{CreateMedia, UpdateMediaMetadata};
use folio_db::models::page::SavePage;
use folio_db::models::post::SavePost;
use folio_db::models::role::SaveRole;
use folio_db::models::session::CreateSession;
use folio_db::models::user::CreateUser;
use folio_db::repositories::{
    CategoryRepo, MediaRepo, PageRepo, PostRepo, RoleRepo, SessionRepo, SettingRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Editor".to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: "admin".to_string(),
        is_active: true,
    }
}

fn new_post(title: &str, status: PublishStatus) -> SavePost {
    SavePost {
        title: title.to_string(),
        excerpt: None,
        content: format!("Body of {title}"),
        status,
        featured_image_id: None,
        published_at: None,
        category_ids: None,
    }
}

fn new_media(filename: &str) -> CreateMedia {
    CreateMedia {
        filename: filename.to_string(),
        original_name: filename.to_string(),
        mime_type: "image/png".to_string(),
        size: 128,
        width: Some(4),
        height: Some(4),
        path: format!("/tmp/{filename}"),
        url: format!("/uploads/{filename}"),
    }
}

fn list_query(search: Option<&str>, status: Option<PublishStatus>) -> ListQuery {
    ListQuery {
        page: 1,
        limit: 10,
        search: search.map(str::to_string),
        status,
        sort_column: "created_at",
        sort_dir: SortDirection::Desc,
    }
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_session_identity_lookup(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@example.com")).await.unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            token_hash: "hash-1".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        },
    )
    .await
    .unwrap();

    let identity = SessionRepo::find_identity_by_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .expect("session should exist");
    assert_eq!(identity.user_id, user.id);
    assert_eq!(identity.email, "a@example.com");
    assert!(identity.is_active);

    assert!(SessionRepo::find_identity_by_token_hash(&pool, "other")
        .await
        .unwrap()
        .is_none());

    assert_eq!(SessionRepo::delete_by_token_hash(&pool, "hash-1").await.unwrap(), 1);
    assert!(SessionRepo::find_identity_by_token_hash(&pool, "hash-1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cleanup_removes_only_expired_sessions(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@example.com")).await.unwrap();
    for (hash, offset) in [("old", -1), ("live", 1)] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id: user.id,
                token_hash: hash.to_string(),
                expires_at: Utc::now() + Duration::hours(offset),
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
    assert!(SessionRepo::find_identity_by_token_hash(&pool, "live")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_delete_removes_sessions(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@example.com")).await.unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            token_hash: "hash-1".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        },
    )
    .await
    .unwrap();

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, user.id).await.unwrap());

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("a@example.com")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("a@example.com"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_users_email"));
    assert!(!is_unique_violation(&err, "uq_roles_name"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_role_name_rejected(pool: PgPool) {
    let role = SaveRole {
        name: "Editor".to_string(),
        description: String::new(),
        permissions: vec!["posts.write".to_string()],
    };
    let created = RoleRepo::create(&pool, &role).await.unwrap();
    assert_eq!(created.permissions, vec!["posts.write".to_string()]);

    let err = RoleRepo::create(&pool, &role).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_roles_name"));
}

// ---------------------------------------------------------------------------
// Content listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_post_list_filters_and_counts(pool: PgPool) {
    PostRepo::create(&pool, &new_post("Rust tips", PublishStatus::Published), "rust-tips")
        .await
        .unwrap();
    PostRepo::create(&pool, &new_post("Rust drafts", PublishStatus::Draft), "rust-drafts")
        .await
        .unwrap();
    PostRepo::create(&pool, &new_post("Gardening", PublishStatus::Published), "gardening")
        .await
        .unwrap();

    let all = list_query(None, None);
    assert_eq!(PostRepo::count(&pool, &all).await.unwrap(), 3);

    let published_rust = list_query(Some("rust"), Some(PublishStatus::Published));
    let posts = PostRepo::list(&pool, &published_rust).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "rust-tips");
    assert_eq!(PostRepo::count(&pool, &published_rust).await.unwrap(), 1);

    // Wildcards in the term are literal.
    let percent = list_query(Some("%"), None);
    assert_eq!(PostRepo::count(&pool, &percent).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_list_pages_and_sorts(pool: PgPool) {
    for title in ["b", "a", "c"] {
        PostRepo::create(&pool, &new_post(title, PublishStatus::Draft), title)
            .await
            .unwrap();
    }

    let mut params = list_query(None, None);
    params.limit = 2;
    params.sort_column = PostRepo::sort_column("title").unwrap();
    params.sort_dir = SortDirection::Asc;

    let first: Vec<_> = PostRepo::list(&pool, &params)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(first, ["a", "b"]);

    params.page = 2;
    let second = PostRepo::list(&pool, &params).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "c");

    assert!(PostRepo::sort_column("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_category_post_counts(pool: PgPool) {
    let news = CategoryRepo::create(
        &pool,
        &SaveCategory {
            name: "News".to_string(),
            description: None,
        },
        "news",
    )
    .await
    .unwrap();
    assert_eq!(news.post_count, 0);

    let post = PostRepo::create(
        &pool,
        &SavePost {
            category_ids: Some(vec![news.id, 999_999]),
            ..new_post("Hello", PublishStatus::Draft)
        },
        "hello",
    )
    .await
    .unwrap();

    let news = CategoryRepo::find_by_id(&pool, news.id).await.unwrap().unwrap();
    assert_eq!(news.post_count, 1);

    let links = PostRepo::category_links(&pool, &[post.id]).await.unwrap();
    assert_eq!(links, vec![(post.id, news.id)]);

    // `None` leaves the links alone.
    PostRepo::update(&pool, post.id, &new_post("Hello", PublishStatus::Draft), "hello")
        .await
        .unwrap()
        .unwrap();
    let news = CategoryRepo::find_by_id(&pool, news.id).await.unwrap().unwrap();
    assert_eq!(news.post_count, 1);

    let cleared = SavePost {
        category_ids: Some(Vec::new()),
        ..new_post("Hello", PublishStatus::Draft)
    };
    PostRepo::update(&pool, post.id, &cleared, "hello")
        .await
        .unwrap()
        .unwrap();
    let news = CategoryRepo::find_by_id(&pool, news.id).await.unwrap().unwrap();
    assert_eq!(news.post_count, 0);
}

/// Make every insert into `post_categories` fail.
async fn break_category_links(pool: &PgPool) {
    sqlx::query(
        "CREATE FUNCTION reject_post_category() RETURNS TRIGGER AS $$
         BEGIN
             RAISE EXCEPTION 'post_categories is read-only';
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER trg_reject_post_category BEFORE INSERT ON post_categories
         FOR EACH ROW EXECUTE FUNCTION reject_post_category()",
    )
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_category_write_rolls_back_post(pool: PgPool) {
    let news = CategoryRepo::create(
        &pool,
        &SaveCategory {
            name: "News".to_string(),
            description: None,
        },
        "news",
    )
    .await
    .unwrap();
    let existing = PostRepo::create(&pool, &new_post("Kept", PublishStatus::Draft), "kept")
        .await
        .unwrap();

    break_category_links(&pool).await;

    let filed = SavePost {
        category_ids: Some(vec![news.id]),
        ..new_post("Hello", PublishStatus::Draft)
    };
    assert!(PostRepo::create(&pool, &filed, "hello").await.is_err());
    assert!(PostRepo::update(&pool, existing.id, &filed, "renamed").await.is_err());

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 1, "the failed create must not leave a post behind");

    let kept = PostRepo::find_by_id(&pool, existing.id).await.unwrap().unwrap();
    assert_eq!(kept.title, "Kept");
    assert_eq!(kept.slug, "kept");
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_media_in_use_by_page(pool: PgPool) {
    let media = MediaRepo::create(&pool, &new_media("logo-1.png")).await.unwrap();
    assert!(!MediaRepo::is_in_use(&pool, media.id).await.unwrap());

    PageRepo::create(
        &pool,
        &SavePage {
            title: "About".to_string(),
            content: String::new(),
            status: PublishStatus::Draft,
            featured_image_id: Some(media.id),
            published_at: None,
        },
        "about",
    )
    .await
    .unwrap();

    assert!(MediaRepo::is_in_use(&pool, media.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_media_metadata_blank_becomes_null(pool: PgPool) {
    let media = MediaRepo::create(&pool, &new_media("logo-1.png")).await.unwrap();

    let updated = MediaRepo::update_metadata(
        &pool,
        media.id,
        &UpdateMediaMetadata {
            title: "Logo".to_string(),
            alt_text: "   ".to_string(),
            caption: String::new(),
            description: "Brand mark".to_string(),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title.as_deref(), Some("Logo"));
    assert_eq!(updated.alt_text, None);
    assert_eq!(updated.caption, None);
    assert_eq!(updated.description.as_deref(), Some("Brand mark"));
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_settings_upsert_overwrites(pool: PgPool) {
    SettingRepo::upsert(&pool, "siteTitle", "First").await.unwrap();
    SettingRepo::upsert_many(&pool, &[("siteTitle", "Second"), ("tagline", "Hi")])
        .await
        .unwrap();

    assert_eq!(
        SettingRepo::get(&pool, "siteTitle").await.unwrap().as_deref(),
        Some("Second")
    );
    assert_eq!(SettingRepo::list(&pool).await.unwrap().len(), 2);
}
