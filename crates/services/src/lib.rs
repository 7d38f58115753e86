#![forbid(unsafe_code)]

pub mod app_services;
pub mod email_capture_service;
pub mod error;
pub mod leaderboard_service;
pub mod question_source;
pub mod quiz_loop;
pub mod subject_catalog_service;
pub mod supply;

pub use quiz_core::Clock;

pub use app_services::{AppServices, StoreConfig};
pub use email_capture_service::EmailCaptureService;
pub use error::{AppServicesError, EmailCaptureError, LeaderboardError, QuestionSourceError};
pub use leaderboard_service::{LEADERBOARD_LIMIT, LeaderboardService};
pub use question_source::{DEFAULT_BATCH_SIZE, QuestionSource};
pub use quiz_loop::{FetchKind, FetchRequest, FetchResponse, QuizLoopService, QuizStore, SessionGeneration};
pub use subject_catalog_service::SubjectCatalogService;
pub use supply::{LOOKAHEAD, SupplyManager};
