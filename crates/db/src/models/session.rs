//! Login session model and DTOs.

use folio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// A session joined with the identity fields of its owner.
#[derive(Debug, Clone, FromRow)]
pub struct SessionIdentity {
    pub session_id: DbId,
    pub expires_at: Timestamp,
    pub user_id: DbId,
    pub email: String,
    pub name: String,
    pub is_active: bool,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
