#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use folio_api::auth::password::hash_password;
use folio_api::auth::session::SessionConfig;
use folio_api::config::ServerConfig;
use folio_api::middleware::csrf::CSRF_HEADER;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_db::models::user::{CreateUser, User};
use folio_db::repositories::UserRepo;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";

/// Build a test `ServerConfig` with safe defaults, writing uploads to
/// `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        production: false,
        session: SessionConfig {
            secret: "test-session-secret".to_string(),
            ttl_hours: 24,
            cookie_name: "cms_session".to_string(),
            csrf_cookie_name: "cms_csrf".to_string(),
            secure_cookies: false,
        },
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        login_rate_limit_max: 20,
        login_rate_limit_window_secs: 600,
        admin_bootstrap: None,
    }
}

/// The application under test plus the temporary upload directory it
/// writes to (removed on drop).
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {})
}

/// Like [`build_test_app`] but lets the test adjust the configuration.
pub fn build_test_app_with(pool: PgPool, tweak: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config(uploads.path());
    tweak(&mut config);

    let router = build_app_router(AppState::new(pool, config.clone()));
    TestApp {
        router,
        config,
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Cookies and CSRF token of a logged-in client.
#[derive(Debug, Clone)]
pub struct Session {
    /// Value for the `Cookie` request header.
    pub cookie: String,
    pub csrf: String,
}

/// `name=value` pairs from every `Set-Cookie` header, joined for a `Cookie`
/// request header.
pub fn cookie_header(response: &Response) -> String {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The raw `Set-Cookie` header for `name`, if any.
pub fn set_cookie<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
}

pub async fn create_user(pool: &PgPool, email: &str, password: &str, is_active: bool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: "admin".to_string(),
            is_active,
        },
    )
    .await
    .unwrap()
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> Session {
    let response = app
        .send(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let cookie = cookie_header(&response);
    let body = body_json(response).await;
    Session {
        cookie,
        csrf: body["data"]["csrfToken"].as_str().unwrap().to_string(),
    }
}

/// Create the default admin account and log in as it.
pub async fn sign_in(app: &TestApp, pool: &PgPool) -> Session {
    create_user(pool, ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn with_session(
    builder: axum::http::request::Builder,
    session: Option<&Session>,
) -> axum::http::request::Builder {
    match session {
        Some(s) => builder
            .header(COOKIE, &s.cookie)
            .header(CSRF_HEADER, &s.csrf),
        None => builder,
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    session: Option<&Session>,
    body: &Value,
) -> Request<Body> {
    with_session(Request::builder().method(method).uri(uri), session)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, session: Option<&Session>) -> Request<Body> {
    with_session(Request::builder().method(method).uri(uri), session)
        .body(Body::empty())
        .unwrap()
}

pub async fn get(app: &TestApp, uri: &str, session: Option<&Session>) -> Response {
    app.send(empty_request(Method::GET, uri, session)).await
}

pub async fn delete(app: &TestApp, uri: &str, session: &Session) -> Response {
    app.send(empty_request(Method::DELETE, uri, Some(session)))
        .await
}

pub async fn post_json(app: &TestApp, uri: &str, session: &Session, body: Value) -> Response {
    app.send(json_request(Method::POST, uri, Some(session), &body))
        .await
}

pub async fn put_json(app: &TestApp, uri: &str, session: &Session, body: Value) -> Response {
    app.send(json_request(Method::PUT, uri, Some(session), &body))
        .await
}

/// Multipart upload with a single part named `field`.
pub fn multipart_request(
    uri: &str,
    session: &Session,
    field: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "folio-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    with_session(
        Request::builder().method(Method::POST).uri(uri),
        Some(session),
    )
    .header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(Body::from(body))
    .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the error envelope's status and code, returning the body.
pub async fn expect_error(response: Response, status: StatusCode, code: &str) -> Value {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], code, "unexpected body: {body}");
    body
}
