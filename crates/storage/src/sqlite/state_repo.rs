use async_trait::async_trait;
use serde_json::Value;

use super::SqliteRepository;
use super::mapping::unavailable;
use crate::repository::{SessionStateRepository, StateKey, StorageError};

#[async_trait]
impl SessionStateRepository for SqliteRepository {
    async fn get_state(&self, key: StateKey) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT value FROM session_state WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)?;

        raw.map(|text| {
            serde_json::from_str(&text)
                .map_err(|e| StorageError::Serialization(format!("{}: {e}", key.as_str())))
        })
        .transpose()
    }

    async fn set_state(&self, key: StateKey, value: Option<Value>) -> Result<(), StorageError> {
        match value {
            Some(value) => {
                sqlx::query(
                    r"
                    INSERT INTO session_state (key, value)
                    VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value
                    ",
                )
                .bind(key.as_str())
                .bind(value.to_string())
                .execute(&self.pool)
                .await
                .map_err(unavailable)?;
            }
            None => {
                sqlx::query("DELETE FROM session_state WHERE key = ?1")
                    .bind(key.as_str())
                    .execute(&self.pool)
                    .await
                    .map_err(unavailable)?;
            }
        }
        Ok(())
    }
}
