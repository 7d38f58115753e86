use std::fmt;
use std::sync::Arc;

use quiz_core::model::{DateRange, Question, QuestionId, TagFilter};
use quiz_core::quiz::{
    GamePhase, QuizEvent, QuizState, SessionIssue, TransitionError, TransitionOutcome,
};
use tracing::{debug, info, warn};

use crate::error::QuestionSourceError;
use crate::question_source::{DEFAULT_BATCH_SIZE, QuestionSource};
use crate::supply::SupplyManager;

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

/// Identifies one session. Bumped on every start and restart so answers to
/// requests from an earlier session can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    #[must_use]
    pub fn first() -> Self {
        Self(1)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First batch of a session.
    Initial,
    /// Top-up while the session is running.
    More,
}

/// A batch the store wants fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: SessionGeneration,
    pub kind: FetchKind,
    pub tag: TagFilter,
    pub date_range: DateRange,
    pub batch_size: usize,
    pub exclude: Vec<QuestionId>,
}

/// Result of running a `FetchRequest`, handed back to `QuizStore::resolve`.
#[derive(Debug)]
pub struct FetchResponse {
    pub generation: SessionGeneration,
    pub kind: FetchKind,
    pub result: Result<Vec<Question>, QuestionSourceError>,
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Sole owner of the live quiz session.
///
/// All changes go through `dispatch` (player actions) and `resolve` (fetch
/// results). Either may hand back a `FetchRequest` for the caller to run.
#[derive(Debug, Clone)]
pub struct QuizStore {
    state: QuizState,
    generation: SessionGeneration,
    supply: SupplyManager,
    batch_size: usize,
}

impl Default for QuizStore {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl QuizStore {
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            state: QuizState::new(),
            generation: SessionGeneration::default(),
            supply: SupplyManager::new(),
            batch_size: batch_size.max(1),
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether a fetch for the current session is outstanding.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.supply.in_flight() == Some(self.generation)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.supply.is_exhausted()
    }

    /// Apply a player action.
    ///
    /// # Errors
    ///
    /// Returns the `TransitionError` from the state machine, or
    /// `TransitionError::AlreadyAnswered` for a second answer to the current
    /// question. The session is unchanged in either case.
    pub fn dispatch(&mut self, event: QuizEvent) -> Result<Option<FetchRequest>, TransitionError> {
        let name = event.name();
        // One answer card per question.
        if matches!(event, QuizEvent::Answer { .. }) && self.state.is_current_answered() {
            debug!(
                target: "quiz.store",
                index = self.state.current_index(),
                "duplicate answer dropped"
            );
            return Err(TransitionError::AlreadyAnswered);
        }
        let resets = matches!(event, QuizEvent::Start(_) | QuizEvent::Restart);
        let feeds_supply = matches!(
            event,
            QuizEvent::Answer { .. }
                | QuizEvent::Advance
                | QuizEvent::QuestionsLoaded(_)
                | QuizEvent::MoreQuestionsLoaded(_)
        );

        let outcome = self.state.apply(event).map_err(|e| {
            debug!(target: "quiz.store", event = name, error = %e, "transition rejected");
            e
        })?;

        if resets {
            self.generation = self.generation.next();
            self.supply.reset();
        }
        debug!(
            target: "quiz.store",
            event = name,
            phase = %self.state.phase(),
            generation = %self.generation,
            index = self.state.current_index(),
            lives = self.state.lives(),
            score = self.state.score(),
            "transition applied"
        );

        match outcome {
            TransitionOutcome::SessionStarted => {
                info!(target: "quiz.store", generation = %self.generation, "session started");
                Ok(self.request_initial())
            }
            TransitionOutcome::Finished => {
                info!(
                    target: "quiz.store",
                    score = self.state.score(),
                    answered = self.state.answer_cards().len(),
                    "session finished"
                );
                Ok(None)
            }
            TransitionOutcome::Applied if feeds_supply => Ok(self.poll_supply()),
            TransitionOutcome::Applied => Ok(None),
        }
    }

    /// Feed a fetch result back in. Responses from an earlier session are
    /// dropped.
    pub fn resolve(&mut self, response: FetchResponse) -> Option<FetchRequest> {
        if response.generation != self.generation {
            debug!(
                target: "quiz.store",
                stale = %response.generation,
                current = %self.generation,
                "discarding response from a previous session"
            );
            return None;
        }

        let batch = match response.result {
            Ok(batch) => batch,
            Err(e) => {
                warn!(target: "quiz.store", error = %e, "question fetch failed");
                self.supply.fail();
                let _ = self
                    .state
                    .apply(QuizEvent::Error(SessionIssue::data_fetch(e.to_string())));
                return None;
            }
        };

        let before = self.state.questions().len();
        let event = match response.kind {
            FetchKind::Initial => QuizEvent::QuestionsLoaded(batch),
            FetchKind::More => QuizEvent::MoreQuestionsLoaded(batch),
        };
        if let Err(e) = self.state.apply(event) {
            debug!(target: "quiz.store", error = %e, "batch arrived after the quiz ended");
            self.supply.fail();
            return None;
        }

        let added = self.state.questions().len() - before;
        self.supply.settle(added);
        debug!(
            target: "quiz.store",
            added,
            pool = self.state.questions().len(),
            "batch merged"
        );
        self.poll_supply()
    }

    /// Ask again after a failed fetch.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.state.phase() != GamePhase::Quiz || self.supply.is_exhausted() {
            return None;
        }
        if self.state.questions().is_empty() {
            self.request_initial()
        } else {
            self.poll_supply()
        }
    }

    fn request_initial(&mut self) -> Option<FetchRequest> {
        if !self.state.questions().is_empty() || !self.supply.begin(self.generation) {
            return None;
        }
        Some(self.request(FetchKind::Initial))
    }

    fn poll_supply(&mut self) -> Option<FetchRequest> {
        if self.supply.poll(&self.state, self.generation) {
            Some(self.request(FetchKind::More))
        } else {
            None
        }
    }

    fn request(&self, kind: FetchKind) -> FetchRequest {
        let profile = self.state.profile();
        FetchRequest {
            generation: self.generation,
            kind,
            tag: profile.tag.clone(),
            date_range: profile.date_range,
            batch_size: self.batch_size,
            exclude: self.state.consumed().iter().copied().collect(),
        }
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Runs the store's fetch requests against the question source.
#[derive(Clone)]
pub struct QuizLoopService {
    source: Arc<QuestionSource>,
    batch_size: usize,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(source: Arc<QuestionSource>, batch_size: usize) -> Self {
        Self { source, batch_size }
    }

    /// A fresh store using this service's batch size.
    #[must_use]
    pub fn new_store(&self) -> QuizStore {
        QuizStore::new(self.batch_size)
    }

    pub async fn fulfil(&self, request: &FetchRequest) -> FetchResponse {
        let result = self
            .source
            .fetch_batch(
                &request.tag,
                request.date_range,
                request.batch_size,
                &request.exclude,
            )
            .await;
        FetchResponse {
            generation: request.generation,
            kind: request.kind,
            result,
        }
    }

    /// Run `request` and any follow-ups it triggers until the store is
    /// satisfied.
    pub async fn drive(&self, store: &mut QuizStore, request: Option<FetchRequest>) {
        let mut next = request;
        while let Some(request) = next {
            let response = self.fulfil(&request).await;
            next = store.resolve(response);
        }
    }

    /// Dispatch `event` and settle every fetch it causes.
    ///
    /// # Errors
    ///
    /// Returns the `TransitionError` if the event is rejected.
    pub async fn dispatch(
        &self,
        store: &mut QuizStore,
        event: QuizEvent,
    ) -> Result<(), TransitionError> {
        let request = store.dispatch(event)?;
        self.drive(store, request).await;
        Ok(())
    }
}
