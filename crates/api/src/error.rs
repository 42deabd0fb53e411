use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use folio_core::error::CoreError;
use folio_db::slug::SlugError;
use serde_json::{json, Value};
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ "error": { code, message,
/// details? } }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Slug assignment failed.
    #[error(transparent)]
    Slug(#[from] SlugError),

    /// Field-level validation failures from `validator`.
    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationErrors),

    /// A request body or query string that could not be decoded.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// Upload request without a `file` part.
    #[error("No file uploaded")]
    FileRequired,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Uploaded file is too large")]
    FileTooLarge,

    /// Any other multipart or storage failure while receiving an upload.
    #[error("Upload error: {0}")]
    Upload(String),

    /// No route matches the request path.
    #[error("Route not found")]
    RouteNotFound,

    /// Login attempts exhausted for the current window.
    #[error("Too many login attempts")]
    TooManyRequests { retry_after_secs: u64 },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Malformed(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::FileTooLarge
        } else {
            AppError::Upload(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;
        let mut retry_after: Option<u64> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict { code, message } => {
                    (StatusCode::CONFLICT, *code, message.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::SessionExpired => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_EXPIRED",
                    "Session expired or invalid".to_string(),
                ),
                CoreError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                ),
                CoreError::CsrfMismatch => (
                    StatusCode::FORBIDDEN,
                    "CSRF_MISMATCH",
                    "Invalid CSRF token".to_string(),
                ),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Slug(SlugError::Exhausted { base, attempts }) => {
                tracing::warn!(base = %base, attempts, "Slug candidates exhausted");
                (
                    StatusCode::CONFLICT,
                    "DUPLICATE_SLUG",
                    format!("Could not find a free slug for '{base}'"),
                )
            }
            AppError::Slug(SlugError::Database(err)) => classify_sqlx_error(err),

            // --- Request validation ---
            AppError::Invalid(errors) => {
                details = Some(json!({ "fieldErrors": field_errors(errors) }));
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                )
            }
            AppError::Malformed(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),

            // --- Uploads ---
            AppError::FileRequired => (
                StatusCode::BAD_REQUEST,
                "FILE_REQUIRED",
                "No file uploaded".to_string(),
            ),
            AppError::UnsupportedFileType(_) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FILE_TYPE",
                "Unsupported file type".to_string(),
            ),
            AppError::FileTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                "Uploaded file is too large".to_string(),
            ),
            AppError::Upload(msg) => (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", msg.clone()),

            AppError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Route not found".to_string(),
            ),

            AppError::TooManyRequests { retry_after_secs } => {
                retry_after = Some(*retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "TOO_MANY_REQUESTS",
                    "Too many login attempts. Try again later.".to_string(),
                )
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut error = json!({ "code": code, "message": message });
        if let Some(details) = details {
            error["details"] = details;
        }

        let mut response = (status, axum::Json(json!({ "error": error }))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error".to_string(),
    )
}

/// `{ field: [message, ...] }` from validator output, keyed by the
/// camelCase name the client sent.
fn field_errors(errors: &ValidationErrors) -> Value {
    let map: serde_json::Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<Value> = errs
                .iter()
                .map(|e| {
                    let text = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    Value::String(text)
                })
                .collect();
            (camel_case(&field), Value::Array(messages))
        })
        .collect();
    Value::Object(map)
}

/// `alt_text` -> `altText`.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a known `uq_*` constraint map to 409 with the
///   matching code; other `uq_*` constraints map to `CONFLICT`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match constraint {
                "uq_users_email" => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_EMAIL",
                    "A user with this email already exists".to_string(),
                ),
                "uq_roles_name" => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_NAME",
                    "A role with this name already exists".to_string(),
                ),
                "uq_posts_slug" | "uq_pages_slug" | "uq_categories_slug" => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_SLUG",
                    "Slug is already in use".to_string(),
                ),
                c if c.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {c}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
