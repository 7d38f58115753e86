use std::sync::Arc;

use storage::remote::{RemoteConfig, RemoteStore};
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::email_capture_service::EmailCaptureService;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::question_source::{DEFAULT_BATCH_SIZE, QuestionSource};
use crate::quiz_loop::QuizLoopService;
use crate::subject_catalog_service::SubjectCatalogService;

/// Where the app keeps its data.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Local `SQLite` database. Always used for preferences.
    pub db_url: String,
    /// Shared REST store for questions, scores and subscribers, when configured.
    pub remote: Option<RemoteConfig>,
    pub batch_size: usize,
}

impl StoreConfig {
    #[must_use]
    pub fn local(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            remote: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    subjects: Arc<SubjectCatalogService>,
    leaderboard: Arc<LeaderboardService>,
    email_capture: Arc<EmailCaptureService>,
}

impl AppServices {
    /// Open local storage, attach the remote store if configured, and build services.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn connect(config: &StoreConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let mut storage = Storage::sqlite(&config.db_url).await?;
        if let Some(remote) = &config.remote {
            info!(base_url = %remote.base_url, "using remote question store");
            storage = storage.with_remote(RemoteStore::new(remote.clone()));
        }
        Ok(Self::from_storage(&storage, clock, config.batch_size))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, batch_size: usize) -> Self {
        let source = Arc::new(QuestionSource::new(clock, Arc::clone(&storage.questions)));
        Self {
            quiz_loop: Arc::new(QuizLoopService::new(source, batch_size)),
            subjects: Arc::new(SubjectCatalogService::new(
                clock,
                Arc::clone(&storage.questions),
            )),
            leaderboard: Arc::new(LeaderboardService::new(
                clock,
                Arc::clone(&storage.leaderboard),
                Arc::clone(&storage.preferences),
            )),
            email_capture: Arc::new(EmailCaptureService::new(
                clock,
                Arc::clone(&storage.subscribers),
                Arc::clone(&storage.preferences),
            )),
        }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, DEFAULT_BATCH_SIZE)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn subjects(&self) -> Arc<SubjectCatalogService> {
        Arc::clone(&self.subjects)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn email_capture(&self) -> Arc<EmailCaptureService> {
        Arc::clone(&self.email_capture)
    }
}
