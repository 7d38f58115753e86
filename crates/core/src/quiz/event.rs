use std::fmt;
use thiserror::Error;

use crate::model::{Question, UserProfile, Verdict};

/// Shown when the first fetch of a session comes back empty.
pub const NO_CONTENT_FATAL: &str =
    "No more unique questions available. Please try different filters or restart the quiz.";

/// Shown when a follow-up fetch comes back empty mid-session.
pub const NO_CONTENT_CONTINUE: &str =
    "No more unique questions available. Please continue until you lose all lives.";

/// Top-level screen of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    #[default]
    Menu,
    Quiz,
    Results,
}

impl GamePhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Quiz => "quiz",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem surfaced to the player on the quiz screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIssue {
    /// The question store failed; retryable.
    DataFetch { message: String },
    /// The filters yielded nothing new. Fatal when the pool is empty.
    NoContent { fatal: bool },
}

impl SessionIssue {
    #[must_use]
    pub fn data_fetch(message: impl Into<String>) -> Self {
        Self::DataFetch {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::DataFetch { message } => message,
            Self::NoContent { fatal: true } => NO_CONTENT_FATAL,
            Self::NoContent { fatal: false } => NO_CONTENT_CONTINUE,
        }
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoContent { fatal: true })
    }
}

impl fmt::Display for SessionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Input to [`QuizState::apply`](super::QuizState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Start(UserProfile),
    QuestionsLoaded(Vec<Question>),
    Answer { verdict: Verdict, elapsed_secs: u32 },
    Advance,
    MoreQuestionsLoaded(Vec<Question>),
    Finish,
    Restart,
    Error(SessionIssue),
}

impl QuizEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::QuestionsLoaded(_) => "questions_loaded",
            Self::Answer { .. } => "answer",
            Self::Advance => "advance",
            Self::MoreQuestionsLoaded(_) => "more_questions_loaded",
            Self::Finish => "finish",
            Self::Restart => "restart",
            Self::Error(_) => "error",
        }
    }
}

/// What an accepted transition asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    /// A new session began; its first batch must be fetched.
    SessionStarted,
    /// The session moved to results.
    Finished,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("{event} is not allowed in the {phase} phase")]
    InvalidPhase {
        event: &'static str,
        phase: GamePhase,
    },
    #[error("there is no current question to answer")]
    NoCurrentQuestion,
    #[error("no lives left")]
    NoLivesLeft,
    #[error("the current question has already been answered")]
    AlreadyAnswered,
}
