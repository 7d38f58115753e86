use chrono::{DateTime, Utc};
use quiz_core::model::{LeaderboardEntry, NewScore, Subject};

use super::SqliteRepository;
use super::mapping::map_leaderboard_row;
use crate::repository::{LeaderboardRepository, StorageError};

#[async_trait::async_trait]
impl LeaderboardRepository for SqliteRepository {
    async fn insert_score(
        &self,
        score: &NewScore,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO leaderboard (username, score, subject, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(score.username.as_str())
        .bind(i64::from(score.score))
        .bind(score.subject.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn top_scores(
        &self,
        limit: u32,
        subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, username, score, subject, created_at
            FROM leaderboard
            WHERE ?1 IS NULL OR subject = ?1
            ORDER BY score DESC, created_at ASC, id ASC
            LIMIT ?2
            ",
        )
        .bind(subject.map(Subject::as_str))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(map_leaderboard_row(&row)?);
        }
        Ok(entries)
    }
}
