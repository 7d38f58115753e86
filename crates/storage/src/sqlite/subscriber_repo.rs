use chrono::{DateTime, Utc};
use quiz_core::model::EmailAddress;

use super::SqliteRepository;
use crate::repository::{StorageError, SubscriberRepository};

#[async_trait::async_trait]
impl SubscriberRepository for SqliteRepository {
    async fn upsert_email(
        &self,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO email_subscribers (email, created_at)
            VALUES (?1, ?2)
            ON CONFLICT(email) DO NOTHING
            ",
        )
        .bind(email.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
