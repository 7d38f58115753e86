//! Quiz session state machine.

mod event;
mod state;

pub use event::{
    GamePhase, NO_CONTENT_CONTINUE, NO_CONTENT_FATAL, QuizEvent, SessionIssue, TransitionError,
    TransitionOutcome,
};
pub use state::{MAX_LIVES, QuizState};
