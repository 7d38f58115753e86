//! Hosted REST backend speaking the PostgREST dialect.
//!
//! Serves questions, the leaderboard and email capture. Preferences are
//! always kept locally.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{EmailAddress, LeaderboardEntry, NewScore, QuestionDraft, Subject};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::repository::{
    LeaderboardRepository, QuestionQuery, QuestionRepository, Storage, StorageError,
    SubscriberRepository,
};

pub(crate) mod rows;

use rows::{LeaderboardRow, NewScoreRow, QuestionRow, SubscriberRow, TagsRow};

const QUESTIONS_TABLE: &str = "questions";
const LEADERBOARD_TABLE: &str = "leaderboard";
const SUBSCRIBERS_TABLE: &str = "email_subscribers";

/// Rows sent per upsert request.
const UPSERT_CHUNK: usize = 100;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteStoreError {
    #[error("invalid store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("store api key is empty")]
    MissingApiKey,
}

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub api_key: String,
}

impl RemoteConfig {
    /// # Errors
    ///
    /// Returns `RemoteStoreError` if the URL does not parse or the key is blank.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, RemoteStoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RemoteStoreError::MissingApiKey);
        }
        let base_url = Url::parse(base_url.trim())?;
        Ok(Self { base_url, api_key })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RemoteStore {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn get(&self, table: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.config.table_url(table)))
    }

    fn post(&self, table: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.config.table_url(table)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(&self, table: &str, request: RequestBuilder) -> Result<Response, StorageError> {
        let response = request.send().await.map_err(|e| {
            warn!(target: "storage.remote", table, error = %e, "request failed");
            StorageError::Connection(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "storage.remote", table, %status, body = %body, "store rejected request");
            return Err(match status.as_u16() {
                404 => StorageError::NotFound,
                409 => StorageError::Conflict,
                _ => StorageError::Connection(format!("{table}: http {status}")),
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StorageError> {
        let response = self.send(table, request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// `ilike` operand matching `tag` literally anywhere in the field.
fn ilike_pattern(tag: &str) -> String {
    let mut pattern = String::with_capacity(tag.len() + 2);
    pattern.push('*');
    for c in tag.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

/// PostgREST filters for a question query.
fn question_params(query: &QuestionQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    if let Some(tag) = query.tag.as_str() {
        params.push(("Tags", format!("ilike.{}", ilike_pattern(tag))));
    }
    if let Some(since) = query.since {
        params.push(("Date", format!("gte.{}", since.to_rfc3339())));
    }
    if !query.exclude.is_empty() {
        let ids: Vec<String> = query.exclude.iter().map(ToString::to_string).collect();
        params.push(("id", format!("not.in.({})", ids.join(","))));
    }
    params.push(("order", "Date.desc.nullslast".to_string()));
    params
}

fn leaderboard_params(limit: u32, subject: Option<&Subject>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", "score.desc,created_at.asc".to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(subject) = subject {
        params.push(("subject", format!("eq.{}", subject.as_str())));
    }
    params
}

#[async_trait]
impl QuestionRepository for RemoteStore {
    async fn query_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, StorageError> {
        let request = self.get(QUESTIONS_TABLE).query(&question_params(query));
        let rows: Vec<QuestionRow> = self.fetch(QUESTIONS_TABLE, request).await?;
        debug!(
            target: "storage.remote",
            rows = rows.len(),
            excluded = query.exclude.len(),
            "queried questions"
        );
        Ok(rows.into_iter().map(QuestionRow::into_draft).collect())
    }

    async fn list_tag_fields(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, StorageError> {
        let mut params = vec![("select", "Tags".to_string())];
        if let Some(since) = since {
            params.push(("Date", format!("gte.{}", since.to_rfc3339())));
        }
        let request = self.get(QUESTIONS_TABLE).query(&params);
        let rows: Vec<TagsRow> = self.fetch(QUESTIONS_TABLE, request).await?;
        Ok(rows.into_iter().filter_map(|row| row.tags).collect())
    }

    async fn upsert_questions(&self, drafts: &[QuestionDraft]) -> Result<usize, StorageError> {
        let mut written = 0;
        for chunk in drafts.chunks(UPSERT_CHUNK) {
            let rows: Vec<QuestionRow> = chunk.iter().map(QuestionRow::from_draft).collect();
            let request = self
                .post(QUESTIONS_TABLE)
                .query(&[("on_conflict", "Title")])
                .header("Prefer", "resolution=merge-duplicates")
                .json(&rows);
            self.send(QUESTIONS_TABLE, request).await?;
            written += chunk.len();
            debug!(target: "storage.remote", written, total = drafts.len(), "uploaded questions");
        }
        Ok(written)
    }
}

#[async_trait]
impl LeaderboardRepository for RemoteStore {
    async fn insert_score(
        &self,
        score: &NewScore,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let request = self
            .post(LEADERBOARD_TABLE)
            .json(&[NewScoreRow::new(score, created_at)]);
        self.send(LEADERBOARD_TABLE, request).await?;
        Ok(())
    }

    async fn top_scores(
        &self,
        limit: u32,
        subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let request = self
            .get(LEADERBOARD_TABLE)
            .query(&leaderboard_params(limit, subject));
        let rows: Vec<LeaderboardRow> = self.fetch(LEADERBOARD_TABLE, request).await?;
        rows.into_iter().map(LeaderboardRow::into_entry).collect()
    }
}

#[async_trait]
impl SubscriberRepository for RemoteStore {
    async fn upsert_email(
        &self,
        email: &EmailAddress,
        _at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let request = self
            .post(SUBSCRIBERS_TABLE)
            .query(&[("on_conflict", "email")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[SubscriberRow {
                email: email.as_str(),
            }]);
        self.send(SUBSCRIBERS_TABLE, request).await?;
        Ok(())
    }
}

impl Storage {
    /// Route questions, leaderboard and email capture to the hosted store,
    /// keeping this storage's preferences.
    #[must_use]
    pub fn with_remote(self, remote: RemoteStore) -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(remote.clone());
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(remote.clone());
        let subscribers: Arc<dyn SubscriberRepository> = Arc::new(remote);
        Self {
            questions,
            leaderboard,
            subscribers,
            preferences: self.preferences,
        }
    }
}
