//! Integration tests for the media library: upload, metadata, deletion.

mod common;

use std::io::Cursor;

use axum::http::StatusCode;
use common::{
    body_json, delete, expect_error, get, multipart_request, post_json, put_json, sign_in,
    Session, TestApp,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::new(width, height);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn upload_png(app: &TestApp, session: &Session, name: &str) -> Value {
    let response = app
        .send(multipart_request(
            "/api/media/upload",
            session,
            "file",
            name,
            "image/png",
            &png_bytes(3, 2),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_stores_file_and_reads_dimensions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;

    let media = upload_png(&app, &session, "My Photo.PNG").await;

    let filename = media["filename"].as_str().unwrap();
    assert!(filename.starts_with("my-photo-"));
    assert!(filename.ends_with(".png"));
    assert_eq!(media["originalName"], "My Photo.PNG");
    assert_eq!(media["mimeType"], "image/png");
    assert_eq!(media["width"], 3);
    assert_eq!(media["height"], 2);
    assert_eq!(media["url"], format!("/uploads/{filename}"));
    assert!(media.get("path").is_none());

    assert!(app.uploads.path().join(filename).exists());

    // Served publicly, no session needed.
    let response = get(&app, &format!("/uploads/{filename}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn svg_upload_has_no_dimensions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;

    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;
    let response = app
        .send(multipart_request(
            "/api/media/upload",
            &session,
            "file",
            "logo.svg",
            "image/svg+xml",
            svg,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let media = body_json(response).await["data"].clone();
    assert!(media["width"].is_null());
    assert!(media["height"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_rejects_unsupported_type(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;

    let response = app
        .send(multipart_request(
            "/api/media/upload",
            &session,
            "file",
            "notes.txt",
            "text/plain",
            b"hello",
        ))
        .await;
    expect_error(response, StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_without_file_part_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;

    let response = app
        .send(multipart_request(
            "/api/media/upload",
            &session,
            "attachment",
            "photo.png",
            "image/png",
            &png_bytes(1, 1),
        ))
        .await;
    expect_error(response, StatusCode::BAD_REQUEST, "FILE_REQUIRED").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn oversized_upload_is_rejected(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), |config| config.max_upload_bytes = 1024);
    let session = sign_in(&app, &pool).await;

    let response = app
        .send(multipart_request(
            "/api/media/upload",
            &session,
            "file",
            "big.png",
            "image/png",
            &vec![0u8; 4096],
        ))
        .await;
    expect_error(response, StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn metadata_update_trims_and_clears(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;
    let media = upload_png(&app, &session, "a.png").await;
    let uri = format!("/api/media/{}", media["id"]);

    let response = put_json(
        &app,
        &uri,
        &session,
        json!({ "title": "  Sunset  ", "altText": "Orange sky", "caption": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Sunset");
    assert_eq!(updated["altText"], "Orange sky");
    assert!(updated["caption"].is_null());
    assert!(updated["description"].is_null());

    let response = put_json(&app, &uri, &session, json!({ "altText": "x".repeat(256) })).await;
    expect_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn metadata_limits_apply_after_trimming(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;
    let media = upload_png(&app, &session, "a.png").await;
    let uri = format!("/api/media/{}", media["id"]);

    let alt = "x".repeat(255);
    let response = put_json(
        &app,
        &uri,
        &session,
        json!({ "altText": format!("   {alt}   "), "title": format!(" {} ", "t".repeat(255)) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["altText"], alt);
    assert_eq!(updated["title"].as_str().unwrap().len(), 255);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn featured_media_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;
    let media = upload_png(&app, &session, "hero.png").await;
    let media_id = media["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        "/api/pages",
        &session,
        json!({ "title": "Home", "content": "x", "featuredImageId": media_id }),
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["featuredImage"]["id"], media_id);

    let response = delete(&app, &format!("/api/media/{media_id}"), &session).await;
    expect_error(response, StatusCode::CONFLICT, "MEDIA_IN_USE").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_row_and_file(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;
    let media = upload_png(&app, &session, "gone.png").await;
    let path = app.uploads.path().join(media["filename"].as_str().unwrap());
    let uri = format!("/api/media/{}", media["id"]);

    let response = delete(&app, &uri, &session).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!path.exists());

    let list = body_json(get(&app, "/api/media", Some(&session)).await).await;
    assert_eq!(list["data"], json!([]));

    let response = delete(&app, &uri, &session).await;
    expect_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let session = sign_in(&app, &pool).await;

    let first = upload_png(&app, &session, "first.png").await;
    let second = upload_png(&app, &session, "second.png").await;

    let list = body_json(get(&app, "/api/media", Some(&session)).await).await;
    let ids: Vec<&Value> = list["data"].as_array().unwrap().iter().map(|m| &m["id"]).collect();
    assert_eq!(ids, vec![&second["id"], &first["id"]]);
}
