use quiz_core::model::{
    LeaderboardEntry, LeaderboardEntryId, QuestionDraft, QuestionId, Subject, Username,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question id overflow".into()))
}

/// `None` lets `SQLite` assign the rowid.
pub(crate) fn draft_id_to_i64(id: u64) -> Result<Option<i64>, StorageError> {
    if id == 0 {
        return Ok(None);
    }
    question_id_to_i64(QuestionId::new(id)).map(Some)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<QuestionDraft, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(QuestionDraft {
        id: u64::try_from(id)
            .map_err(|_| StorageError::Serialization("question id sign overflow".into()))?,
        summary: row.try_get("summary").map_err(ser)?,
        rating: row.try_get("rating").map_err(ser)?,
        context: row.try_get("context").map_err(ser)?,
        image_url: row.try_get("image_url").map_err(ser)?,
        article_url: row.try_get("article_url").map_err(ser)?,
        title: row.try_get("title").map_err(ser)?,
        published_at: row.try_get("published_at").map_err(ser)?,
        tags: row.try_get("tags").map_err(ser)?,
    })
}

pub(crate) fn map_leaderboard_row(row: &SqliteRow) -> Result<LeaderboardEntry, StorageError> {
    let score: i64 = row.try_get("score").map_err(ser)?;
    Ok(LeaderboardEntry {
        id: LeaderboardEntryId::new(row.try_get("id").map_err(ser)?),
        username: Username::new(row.try_get::<String, _>("username").map_err(ser)?)
            .map_err(ser)?,
        score: u32::try_from(score)
            .map_err(|_| StorageError::Serialization(format!("invalid score: {score}")))?,
        subject: Subject::new(row.try_get::<String, _>("subject").map_err(ser)?),
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
