use quiz_core::quiz::{GamePhase, QuizState};
use tracing::debug;

use crate::quiz_loop::SessionGeneration;

/// Ask for more questions once this few remain ahead of the current one.
pub const LOOKAHEAD: usize = 2;

/// Decides when a session needs another batch.
///
/// Holds at most one outstanding request, tagged with the session it belongs
/// to. Once a follow-up batch comes back empty the session is treated as
/// exhausted and no further requests are made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyManager {
    lookahead: usize,
    in_flight: Option<SessionGeneration>,
    exhausted: bool,
}

impl Default for SupplyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplyManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookahead(LOOKAHEAD)
    }

    #[must_use]
    pub fn with_lookahead(lookahead: usize) -> Self {
        Self {
            lookahead,
            in_flight: None,
            exhausted: false,
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<SessionGeneration> {
        self.in_flight
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Forget everything about the previous session.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.exhausted = false;
    }

    /// Claim the request slot for `generation`. Returns false if it is taken.
    pub fn begin(&mut self, generation: SessionGeneration) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(generation);
        true
    }

    /// Whether the buffer ahead of the current question is running low.
    #[must_use]
    pub fn is_low(&self, state: &QuizState) -> bool {
        state.phase() == GamePhase::Quiz
            && state.current_index() + self.lookahead >= state.questions().len()
    }

    /// Claim the slot if `state` needs another batch.
    pub fn poll(&mut self, state: &QuizState, generation: SessionGeneration) -> bool {
        if self.exhausted || !self.is_low(state) {
            return false;
        }
        let claimed = self.begin(generation);
        if claimed {
            debug!(
                target: "quiz.supply",
                %generation,
                index = state.current_index(),
                pool = state.questions().len(),
                "requesting more questions"
            );
        }
        claimed
    }

    /// Release the slot after a response. `added == 0` exhausts the session.
    pub fn settle(&mut self, added: usize) {
        self.in_flight = None;
        if added == 0 {
            self.exhausted = true;
            debug!(target: "quiz.supply", "question supply exhausted");
        }
    }

    /// Release the slot after a failed fetch so the next trigger retries.
    pub fn fail(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DateRange, QuestionDraft, TagFilter, UserProfile};
    use quiz_core::quiz::QuizEvent;

    fn state_with(pool: u64, index: usize) -> QuizState {
        let mut state = QuizState::new();
        state
            .apply(QuizEvent::Start(UserProfile::new(
                None,
                TagFilter::any(),
                DateRange::All,
            )))
            .unwrap();
        let batch = (1..=pool)
            .map(|id| {
                QuestionDraft {
                    id,
                    summary: format!("claim {id}"),
                    rating: "False".into(),
                    ..QuestionDraft::default()
                }
                .validate()
                .unwrap()
            })
            .collect();
        state.apply(QuizEvent::QuestionsLoaded(batch)).unwrap();
        for _ in 0..index {
            state.apply(QuizEvent::Advance).unwrap();
        }
        state
    }

    #[test]
    fn requests_only_when_buffer_is_low() {
        let generation = SessionGeneration::first();
        let mut supply = SupplyManager::new();

        assert!(!supply.poll(&state_with(10, 7), generation));
        assert!(supply.poll(&state_with(10, 8), generation));
        assert_eq!(supply.in_flight(), Some(generation));
    }

    #[test]
    fn never_holds_two_requests() {
        let generation = SessionGeneration::first();
        let mut supply = SupplyManager::new();
        let low = state_with(3, 2);

        assert!(supply.poll(&low, generation));
        assert!(!supply.poll(&low, generation));
        assert!(!supply.begin(generation.next()));

        supply.settle(5);
        assert!(supply.poll(&low, generation));
    }

    #[test]
    fn empty_response_exhausts_and_failure_allows_retry() {
        let generation = SessionGeneration::first();
        let low = state_with(2, 1);

        let mut failing = SupplyManager::new();
        assert!(failing.poll(&low, generation));
        failing.fail();
        assert!(!failing.is_exhausted());
        assert!(failing.poll(&low, generation));

        let mut drained = SupplyManager::new();
        assert!(drained.poll(&low, generation));
        drained.settle(0);
        assert!(drained.is_exhausted());
        assert!(!drained.poll(&low, generation));

        drained.reset();
        assert!(drained.poll(&low, generation));
    }

    #[test]
    fn ignores_sessions_outside_the_quiz_phase() {
        let mut supply = SupplyManager::new();
        assert!(!supply.poll(&QuizState::new(), SessionGeneration::first()));
    }
}
