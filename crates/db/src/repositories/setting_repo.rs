//! Repository for the `settings` key/value table.

use sqlx::PgPool;

use crate::models::setting::Setting;

pub struct SettingRepo;

impl SettingRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(pool)
            .await
    }

    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Upsert several keys atomically.
    pub async fn upsert_many(pool: &PgPool, pairs: &[(&str, &str)]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (key, value) in pairs {
            sqlx::query(UPSERT_SQL)
                .bind(*key)
                .bind(*value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }
}

const UPSERT_SQL: &str = "INSERT INTO settings (key, value) VALUES ($1, $2)
                          ON CONFLICT ON CONSTRAINT uq_settings_key
                          DO UPDATE SET value = EXCLUDED.value";
