use crate::types::DbId;

/// Domain-level failures shared by the repository and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness or referential conflict. `code` is the machine-readable
    /// error code reported to clients (e.g. `DUPLICATE_EMAIL`).
    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },

    /// No session cookie was presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A session cookie was presented but no live session matches it.
    #[error("Session expired or invalid")]
    SessionExpired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid CSRF token")]
    CsrfMismatch,
}
