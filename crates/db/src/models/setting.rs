//! Key/value setting rows.

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
