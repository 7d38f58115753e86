use async_trait::async_trait;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{PreferenceKey, PreferencesRepository, StorageError};

#[async_trait]
impl PreferencesRepository for SqliteRepository {
    async fn get_preference(&self, key: PreferenceKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        row.try_get("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn set_preference(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO preferences (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
