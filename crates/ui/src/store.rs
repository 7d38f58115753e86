use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::quiz::{GamePhase, QuizEvent, TransitionError};
use services::{FetchRequest, QuizLoopService, QuizStore};
use tracing::debug;

/// Shared handle on the live session, provided once at the app root.
///
/// Views read the store through the signal and change it only through
/// `dispatch` and `retry`. Fetches run as tasks and feed their results back
/// with `QuizStore::resolve`, so a late answer for an abandoned session is
/// dropped by the store.
#[derive(Clone)]
pub struct QuizHandle {
    store: Signal<QuizStore>,
    quiz_loop: Arc<QuizLoopService>,
}

impl QuizHandle {
    #[must_use]
    pub fn new(store: Signal<QuizStore>, quiz_loop: Arc<QuizLoopService>) -> Self {
        Self { store, quiz_loop }
    }

    #[must_use]
    pub fn store(&self) -> Signal<QuizStore> {
        self.store
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.store.read().state().phase()
    }

    /// # Errors
    ///
    /// Returns the `TransitionError` if the event is not valid right now.
    pub fn dispatch(&self, event: QuizEvent) -> Result<(), TransitionError> {
        let mut store = self.store;
        let request = store.write().dispatch(event)?;
        self.run(request);
        Ok(())
    }

    /// Re-issue the fetch that last failed.
    pub fn retry(&self) {
        let mut store = self.store;
        let request = store.write().retry();
        self.run(request);
    }

    fn run(&self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        let mut store = self.store;
        let quiz_loop = Arc::clone(&self.quiz_loop);
        debug!(
            target: "quiz.ui",
            generation = %request.generation,
            kind = ?request.kind,
            "fetch task started"
        );
        spawn(async move {
            let mut next = Some(request);
            while let Some(request) = next {
                let response = quiz_loop.fulfil(&request).await;
                next = store.write().resolve(response);
            }
        });
    }
}

/// Provide a fresh `QuizHandle` to the subtree.
pub fn use_quiz_provider(quiz_loop: Arc<QuizLoopService>) -> QuizHandle {
    use_context_provider(move || {
        let store = Signal::new(quiz_loop.new_store());
        QuizHandle::new(store, quiz_loop)
    })
}

#[must_use]
pub fn use_quiz() -> QuizHandle {
    use_context::<QuizHandle>()
}
