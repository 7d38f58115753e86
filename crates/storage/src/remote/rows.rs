use chrono::{DateTime, NaiveDate, Utc};
use quiz_core::model::{
    LeaderboardEntry, LeaderboardEntryId, NewScore, QuestionDraft, Subject, Username,
};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// A `questions` row. Column names follow the scraped dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuestionRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
    #[serde(rename = "Rating", default)]
    pub rating: Option<String>,
    #[serde(rename = "Context", default)]
    pub context: Option<String>,
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<String>,
}

impl QuestionRow {
    pub(crate) fn into_draft(self) -> QuestionDraft {
        QuestionDraft {
            id: self.id.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            context: self.context.unwrap_or_default(),
            image_url: self.image,
            article_url: self.url,
            title: self.title.unwrap_or_default(),
            published_at: self.date.as_deref().and_then(parse_date),
            tags: self.tags.unwrap_or_default(),
        }
    }

    pub(crate) fn from_draft(draft: &QuestionDraft) -> Self {
        Self {
            id: (draft.id != 0).then_some(draft.id),
            summary: Some(draft.summary.clone()),
            rating: Some(draft.rating.clone()),
            context: Some(draft.context.clone()),
            image: draft.image_url.clone(),
            url: draft.article_url.clone(),
            title: Some(draft.title.clone()),
            date: draft.published_at.map(|at| at.to_rfc3339()),
            tags: Some(draft.tags.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsRow {
    #[serde(rename = "Tags", default)]
    pub tags: Option<String>,
}

/// Dates arrive either as full timestamps or as bare `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

#[derive(Debug, Serialize)]
pub(crate) struct NewScoreRow<'a> {
    pub username: &'a str,
    pub score: u32,
    pub subject: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewScoreRow<'a> {
    pub(crate) fn new(score: &'a NewScore, created_at: DateTime<Utc>) -> Self {
        Self {
            username: score.username.as_str(),
            score: score.score,
            subject: score.subject.as_str(),
            created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardRow {
    pub id: i64,
    pub username: String,
    pub score: i64,
    #[serde(default)]
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LeaderboardRow {
    pub(crate) fn into_entry(self) -> Result<LeaderboardEntry, StorageError> {
        let score = u32::try_from(self.score)
            .map_err(|_| StorageError::Serialization(format!("invalid score: {}", self.score)))?;
        Ok(LeaderboardEntry {
            id: LeaderboardEntryId::new(self.id),
            username: Username::new(self.username)
                .map_err(|e| StorageError::Serialization(e.to_string()))?,
            score,
            subject: self.subject.map_or_else(Subject::all, Subject::new),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscriberRow<'a> {
    pub email: &'a str,
}
