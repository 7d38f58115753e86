//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ValidationError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionSource` and `SubjectCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("Failed to fetch fact checks from the database.")]
    DataFetch(#[source] StorageError),
}

/// Errors emitted by `LeaderboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to submit score. Please try again.")]
    Submit(#[source] StorageError),
    #[error("Failed to load leaderboard.")]
    Load(#[source] StorageError),
}

/// Errors emitted by `EmailCaptureService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmailCaptureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("An error occurred while starting the quiz. Please try again.")]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
