use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    EmailAddress, LeaderboardEntry, LeaderboardEntryId, NewScore, QuestionDraft, QuestionId,
    Subject, TagFilter, rank_entries,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// Filter for a question-store read.
///
/// Results come back newest first; records without a publish date sort last
/// and never satisfy a `since` bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
    pub tag: TagFilter,
    pub since: Option<DateTime<Utc>>,
    pub exclude: Vec<QuestionId>,
}

impl QuestionQuery {
    #[must_use]
    pub fn matches(&self, draft: &QuestionDraft) -> bool {
        if !self.tag.matches(&draft.tags) {
            return false;
        }
        if let Some(since) = self.since {
            match draft.published_at {
                Some(at) if at >= since => {}
                _ => return false,
            }
        }
        !self.exclude.contains(&QuestionId::new(draft.id))
    }
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch every record matching the query, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn query_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, StorageError>;

    /// Raw tag fields of every record published at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn list_tag_fields(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, StorageError>;

    /// Insert or update records, keyed by title. An id of 0 lets the store
    /// assign one. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any record cannot be stored.
    async fn upsert_questions(&self, drafts: &[QuestionDraft]) -> Result<usize, StorageError>;
}

//
// ─── LEADERBOARD ───────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Append a score.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn insert_score(
        &self,
        score: &NewScore,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Best scores, ranked by score desc then oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn top_scores(
        &self,
        limit: u32,
        subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError>;
}

//
// ─── EMAIL SUBSCRIBERS ─────────────────────────────────────────────────────────
//

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Record an address; repeated addresses are merged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the upsert fails.
    async fn upsert_email(
        &self,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

//
// ─── PREFERENCES ───────────────────────────────────────────────────────────────
//

/// Locally remembered values, keyed the same way across backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Email,
    Username,
}

impl PreferenceKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "quizEmail",
            Self::Username => "quizUsername",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_preference(&self, key: PreferenceKey) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_preference(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<QuestionDraft>>>,
    leaderboard: Arc<Mutex<Vec<LeaderboardEntry>>>,
    subscribers: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    preferences: Arc<Mutex<HashMap<PreferenceKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses captured so far, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn subscribers(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .subscribers
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }
}

fn newest_first(a: &QuestionDraft, b: &QuestionDraft) -> std::cmp::Ordering {
    match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn query_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<QuestionDraft> =
            guard.iter().filter(|d| query.matches(d)).cloned().collect();
        found.sort_by(newest_first);
        Ok(found)
    }

    async fn list_tag_fields(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, StorageError> {
        let query = QuestionQuery {
            since,
            ..QuestionQuery::default()
        };
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|d| query.matches(d))
            .map(|d| d.tags.clone())
            .collect())
    }

    async fn upsert_questions(&self, drafts: &[QuestionDraft]) -> Result<usize, StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for draft in drafts {
            if let Some(existing) = guard.iter_mut().find(|d| d.title == draft.title) {
                let id = existing.id;
                *existing = QuestionDraft {
                    id,
                    ..draft.clone()
                };
                continue;
            }
            let mut stored = draft.clone();
            if stored.id == 0 {
                stored.id = guard.iter().map(|d| d.id).max().unwrap_or(0) + 1;
            }
            guard.push(stored);
        }
        Ok(drafts.len())
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryRepository {
    async fn insert_score(
        &self,
        score: &NewScore,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .leaderboard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = guard.iter().map(|e| e.id.value()).max().unwrap_or(0) + 1;
        guard.push(LeaderboardEntry {
            id: LeaderboardEntryId::new(next),
            username: score.username.clone(),
            score: score.score,
            subject: score.subject.clone(),
            created_at,
        });
        Ok(())
    }

    async fn top_scores(
        &self,
        limit: u32,
        subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let guard = self
            .leaderboard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut entries: Vec<LeaderboardEntry> = guard
            .iter()
            .filter(|e| subject.is_none_or(|s| &e.subject == s))
            .cloned()
            .collect();
        rank_entries(&mut entries);
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }
}

#[async_trait]
impl SubscriberRepository for InMemoryRepository {
    async fn upsert_email(
        &self,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .subscribers
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(email.as_str().to_string()).or_insert(at);
        Ok(())
    }
}

#[async_trait]
impl PreferencesRepository for InMemoryRepository {
    async fn get_preference(&self, key: PreferenceKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set_preference(&self, key: PreferenceKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_string());
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub leaderboard: Arc<dyn LeaderboardRepository>,
    pub subscribers: Arc<dyn SubscriberRepository>,
    pub preferences: Arc<dyn PreferencesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Use one repository value for every concern.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: QuestionRepository
            + LeaderboardRepository
            + SubscriberRepository
            + PreferencesRepository
            + Clone
            + 'static,
    {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(repo.clone());
        let subscribers: Arc<dyn SubscriberRepository> = Arc::new(repo.clone());
        let preferences: Arc<dyn PreferencesRepository> = Arc::new(repo);
        Self {
            questions,
            leaderboard,
            subscribers,
            preferences,
        }
    }
}
