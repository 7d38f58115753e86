use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::ids::QuestionId;
use crate::model::rating::RatingCategory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question summary cannot be empty")]
    EmptySummary,
}

/// Unvalidated fact-check record as it comes out of a store.
///
/// URL fields are kept as raw strings; `validate` drops the ones that do not
/// parse instead of rejecting the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: u64,
    pub summary: String,
    pub rating: String,
    pub context: String,
    pub image_url: Option<String>,
    pub article_url: Option<String>,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: String,
}

impl QuestionDraft {
    /// Build a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySummary` if the claim text is blank.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let summary = self.summary.trim();
        if summary.is_empty() {
            return Err(QuestionError::EmptySummary);
        }

        Ok(Question {
            id: QuestionId::new(self.id),
            summary: summary.to_string(),
            rating: self.rating.trim().to_string(),
            context: self.context,
            image_url: parse_link(self.image_url.as_deref()),
            article_url: parse_link(self.article_url.as_deref()),
            title: self.title.trim().to_string(),
            published_at: self.published_at,
            tags: self.tags,
        })
    }
}

fn parse_link(raw: Option<&str>) -> Option<Url> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Url::parse(raw).ok()
}

/// A single fact-checked claim. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    summary: String,
    rating: String,
    context: String,
    image_url: Option<Url>,
    article_url: Option<Url>,
    title: String,
    published_at: Option<DateTime<Utc>>,
    tags: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// The claim shown to the player.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Raw rating label from the fact-checker (e.g. "Mostly False").
    #[must_use]
    pub fn rating(&self) -> &str {
        &self.rating
    }

    #[must_use]
    pub fn category(&self) -> RatingCategory {
        RatingCategory::classify(&self.rating)
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    #[must_use]
    pub fn article_url(&self) -> Option<&Url> {
        self.article_url.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Free-text tag field, as stored.
    #[must_use]
    pub fn tags(&self) -> &str {
        &self.tags
    }
}
