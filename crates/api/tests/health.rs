//! Integration tests for the health check and app-wide HTTP behaviour.

mod common;

use axum::http::header::COOKIE;
use axum::http::{Method, StatusCode};
use common::{body_json, empty_request, expect_error, get, set_cookie};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["dbHealthy"], true);
    assert!(json["data"]["version"].is_string());
    assert!(json["data"]["timestamp"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_not_found_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/does-not-exist", None).await;
    expect_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn first_visit_gets_readable_csrf_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/health", None).await;

    let cookie = set_cookie(&response, "cms_csrf").expect("CSRF cookie should be issued");
    assert!(!cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));

    let value = cookie.split(';').next().unwrap().trim_start_matches("cms_csrf=");
    assert_eq!(value.len(), 48, "24 random bytes, hex encoded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn existing_csrf_cookie_is_not_reissued(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut request = empty_request(Method::GET, "/api/health", None);
    request
        .headers_mut()
        .insert(COOKIE, "cms_csrf=already-set".parse().unwrap());
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "cms_csrf").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_request_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/health", None).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
