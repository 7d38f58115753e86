use std::collections::BTreeSet;

use crate::model::{AnswerCard, Question, QuestionId, UserProfile, Verdict};
use crate::quiz::event::{GamePhase, QuizEvent, SessionIssue, TransitionError, TransitionOutcome};
use crate::scoring;

/// Lives at the start of every session.
pub const MAX_LIVES: u8 = 3;

/// State of a single quiz session.
///
/// Mutated only through [`QuizState::apply`]. A rejected event leaves the
/// state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    phase: GamePhase,
    profile: UserProfile,
    questions: Vec<Question>,
    current_index: usize,
    lives: u8,
    score: u32,
    total_time_secs: u64,
    error: Option<SessionIssue>,
    consumed: BTreeSet<QuestionId>,
    answer_cards: Vec<AnswerCard>,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Menu,
            profile: UserProfile::default(),
            questions: Vec::new(),
            current_index: 0,
            lives: MAX_LIVES,
            score: 0,
            total_time_secs: 0,
            error: None,
            consumed: BTreeSet::new(),
            answer_cards: Vec::new(),
        }
    }
}

impl QuizState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Whether an answer card exists for the current question.
    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.current_question().is_some() && self.answer_cards.len() > self.current_index
    }

    /// Questions at or after the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.current_index)
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u64 {
        self.total_time_secs
    }

    #[must_use]
    pub fn error(&self) -> Option<&SessionIssue> {
        self.error.as_ref()
    }

    /// Every id fetched or answered this session. Sent as the exclusion list.
    #[must_use]
    pub fn consumed(&self) -> &BTreeSet<QuestionId> {
        &self.consumed
    }

    #[must_use]
    pub fn answer_cards(&self) -> &[AnswerCard] {
        &self.answer_cards
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.answer_cards.iter().filter(|card| card.correct).count()
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` when the event is not valid in
    /// the current phase, `TransitionError::NoLivesLeft` when answering with
    /// zero lives, and `TransitionError::NoCurrentQuestion` when answering past
    /// the end of the pool.
    pub fn apply(&mut self, event: QuizEvent) -> Result<TransitionOutcome, TransitionError> {
        match event {
            QuizEvent::Start(profile) => {
                self.require_phase(GamePhase::Menu, "start")?;
                *self = Self {
                    phase: GamePhase::Quiz,
                    profile,
                    ..Self::default()
                };
                Ok(TransitionOutcome::SessionStarted)
            }
            QuizEvent::QuestionsLoaded(batch) => {
                self.require_phase(GamePhase::Quiz, "questions_loaded")?;
                let added = self.merge(batch);
                if added == 0 && self.questions.is_empty() {
                    self.error = Some(SessionIssue::NoContent { fatal: true });
                }
                Ok(TransitionOutcome::Applied)
            }
            QuizEvent::MoreQuestionsLoaded(batch) => {
                self.require_phase(GamePhase::Quiz, "more_questions_loaded")?;
                let added = self.merge(batch);
                if added == 0 {
                    self.error = Some(SessionIssue::NoContent {
                        fatal: self.questions.is_empty(),
                    });
                }
                Ok(TransitionOutcome::Applied)
            }
            QuizEvent::Answer {
                verdict,
                elapsed_secs,
            } => {
                self.require_phase(GamePhase::Quiz, "answer")?;
                self.answer(verdict, elapsed_secs)?;
                Ok(TransitionOutcome::Applied)
            }
            QuizEvent::Advance => {
                self.require_phase(GamePhase::Quiz, "advance")?;
                if self.lives == 0 {
                    self.phase = GamePhase::Results;
                    return Ok(TransitionOutcome::Finished);
                }
                self.current_index = (self.current_index + 1).min(self.questions.len());
                Ok(TransitionOutcome::Applied)
            }
            QuizEvent::Finish => {
                self.require_phase(GamePhase::Quiz, "finish")?;
                self.phase = GamePhase::Results;
                Ok(TransitionOutcome::Finished)
            }
            QuizEvent::Restart => {
                *self = Self::default();
                Ok(TransitionOutcome::Applied)
            }
            QuizEvent::Error(issue) => {
                self.error = Some(issue);
                Ok(TransitionOutcome::Applied)
            }
        }
    }

    fn require_phase(&self, expected: GamePhase, event: &'static str) -> Result<(), TransitionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TransitionError::InvalidPhase {
                event,
                phase: self.phase,
            })
        }
    }

    fn answer(&mut self, verdict: Verdict, elapsed_secs: u32) -> Result<(), TransitionError> {
        if self.lives == 0 {
            return Err(TransitionError::NoLivesLeft);
        }
        let question = self
            .questions
            .get(self.current_index)
            .ok_or(TransitionError::NoCurrentQuestion)?;

        let correct = question.category().accepts(verdict);
        let points = scoring::score(correct, elapsed_secs);
        let card = AnswerCard::record(question, verdict, correct, points);
        let id = question.id();

        if !correct {
            self.lives = self.lives.saturating_sub(1);
        }
        self.score = self.score.saturating_add(points);
        self.total_time_secs = self.total_time_secs.saturating_add(u64::from(elapsed_secs));
        self.consumed.insert(id);
        self.answer_cards.push(card);
        Ok(())
    }

    /// Appends playable questions not seen before; returns how many were added.
    fn merge(&mut self, batch: Vec<Question>) -> usize {
        let before = self.questions.len();
        for question in batch {
            if !question.category().is_playable() {
                continue;
            }
            if self.consumed.insert(question.id()) {
                self.questions.push(question);
            }
        }
        let added = self.questions.len() - before;
        if added > 0 {
            self.error = None;
        }
        added
    }
}
