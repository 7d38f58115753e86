use quiz_core::model::{Question, RatingCategory};
use quiz_core::quiz::{MAX_LIVES, QuizState, SessionIssue};
use services::QuizStore;

use crate::vm::time_fmt::format_fact_date;

/// Everything the quiz screen renders for the current moment of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub question_number: usize,
    pub score: u32,
    pub hearts: Vec<bool>,
    pub stage: QuizStage,
    pub notice: Option<NoticeVm>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizStage {
    /// Waiting on the first batch or a top-up.
    Loading,
    Question(QuestionVm),
    Feedback(FeedbackVm),
    /// The pool is used up and nothing else is coming.
    OutOfQuestions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub summary: String,
    pub image_url: Option<String>,
    pub fact_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub points: u32,
    pub statement: &'static str,
    pub context: String,
    pub article_url: Option<String>,
    pub continue_label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeAction {
    Retry,
    BackToMenu,
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub message: String,
    pub action: NoticeAction,
}

impl NoticeVm {
    #[must_use]
    pub fn from_issue(issue: &SessionIssue) -> Self {
        let action = match issue {
            SessionIssue::DataFetch { .. } => NoticeAction::Retry,
            SessionIssue::NoContent { fatal: true } => NoticeAction::BackToMenu,
            SessionIssue::NoContent { fatal: false } => NoticeAction::None,
        };
        Self {
            message: issue.message().to_string(),
            action,
        }
    }
}

/// Filled hearts first, then empty ones.
#[must_use]
pub fn hearts(lives: u8) -> Vec<bool> {
    (0..MAX_LIVES).map(|slot| slot < lives).collect()
}

/// The current question has been answered and is showing feedback.
#[must_use]
pub fn is_answered(state: &QuizState) -> bool {
    state.is_current_answered()
}

#[must_use]
pub fn map_quiz(store: &QuizStore) -> QuizVm {
    let state = store.state();
    let stage = match state.current_question() {
        Some(question) if is_answered(state) => QuizStage::Feedback(feedback(state, question)),
        Some(question) => QuizStage::Question(QuestionVm {
            summary: question.summary().to_string(),
            image_url: question.image_url().map(ToString::to_string),
            fact_date: question.published_at().map(format_fact_date),
        }),
        None if store.is_fetching() => QuizStage::Loading,
        // Past the end of a served pool with nothing more coming.
        None if store.is_exhausted() && !state.questions().is_empty() => {
            QuizStage::OutOfQuestions
        }
        // Anything else waits on a fetch or on the notice's action.
        None => QuizStage::Loading,
    };

    QuizVm {
        question_number: state.current_index() + 1,
        score: state.score(),
        hearts: hearts(state.lives()),
        stage,
        notice: state.error().map(NoticeVm::from_issue),
    }
}

fn feedback(state: &QuizState, question: &Question) -> FeedbackVm {
    let card = &state.answer_cards()[state.current_index()];
    let statement = match question.category() {
        RatingCategory::Fake => "fake",
        RatingCategory::Real => "true",
        RatingCategory::Ambiguous => "ambiguous",
    };
    FeedbackVm {
        correct: card.correct,
        points: card.points,
        statement,
        context: card.context.clone(),
        article_url: card.article_url.as_ref().map(ToString::to_string),
        continue_label: if state.lives() > 0 {
            "Continue"
        } else {
            "View Results"
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DateRange, QuestionDraft, TagFilter, UserProfile, Verdict};
    use quiz_core::quiz::QuizEvent;
    use services::{FetchKind, FetchResponse, QuestionSourceError};
    use storage::repository::StorageError;

    fn question(id: u64, rating: &str) -> Question {
        QuestionDraft {
            id,
            summary: format!("claim {id}"),
            rating: rating.to_string(),
            context: format!("context {id}"),
            article_url: Some(format!("https://example.org/{id}")),
            ..QuestionDraft::default()
        }
        .validate()
        .unwrap()
    }

    fn started(batch: Vec<Question>) -> QuizStore {
        let mut store = QuizStore::new(20);
        let request = store
            .dispatch(QuizEvent::Start(UserProfile::new(
                None,
                TagFilter::any(),
                DateRange::All,
            )))
            .unwrap()
            .unwrap();
        let _ = store.resolve(FetchResponse {
            generation: request.generation,
            kind: FetchKind::Initial,
            result: Ok(batch),
        });
        store
    }

    #[test]
    fn hearts_fill_from_the_left() {
        assert_eq!(hearts(3), vec![true, true, true]);
        assert_eq!(hearts(1), vec![true, false, false]);
        assert_eq!(hearts(0), vec![false, false, false]);
    }

    #[test]
    fn question_then_feedback() {
        let mut store = started((1..=5).map(|id| question(id, "False")).collect());
        let vm = map_quiz(&store);
        assert_eq!(vm.question_number, 1);
        assert!(matches!(&vm.stage, QuizStage::Question(q) if q.summary == "claim 1"));

        store
            .dispatch(QuizEvent::Answer {
                verdict: Verdict::Real,
                elapsed_secs: 3,
            })
            .unwrap();
        let vm = map_quiz(&store);
        let QuizStage::Feedback(feedback) = vm.stage else {
            panic!("expected feedback");
        };
        assert!(!feedback.correct);
        assert_eq!(feedback.statement, "fake");
        assert_eq!(feedback.continue_label, "Continue");
        assert_eq!(feedback.article_url.as_deref(), Some("https://example.org/1"));
        assert_eq!(vm.hearts, vec![true, true, false]);
    }

    #[test]
    fn last_life_offers_results() {
        let mut store = started((1..=10).map(|id| question(id, "True")).collect());
        for _ in 0..3 {
            store
                .dispatch(QuizEvent::Answer {
                    verdict: Verdict::Fake,
                    elapsed_secs: 1,
                })
                .unwrap();
            if store.state().lives() > 0 {
                store.dispatch(QuizEvent::Advance).unwrap();
            }
        }
        let QuizStage::Feedback(feedback) = map_quiz(&store).stage else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.continue_label, "View Results");
    }

    #[test]
    fn empty_first_batch_leaves_the_menu_action_to_the_notice() {
        let store = started(Vec::new());
        let vm = map_quiz(&store);
        assert_eq!(vm.stage, QuizStage::Loading);
        let notice = vm.notice.unwrap();
        assert_eq!(notice.action, NoticeAction::BackToMenu);
    }

    #[test]
    fn failed_first_fetch_offers_retry_not_results() {
        let mut store = QuizStore::new(20);
        let request = store
            .dispatch(QuizEvent::Start(UserProfile::default()))
            .unwrap()
            .unwrap();
        let _ = store.resolve(FetchResponse {
            generation: request.generation,
            kind: FetchKind::Initial,
            result: Err(QuestionSourceError::DataFetch(StorageError::Connection(
                "offline".into(),
            ))),
        });
        let vm = map_quiz(&store);
        assert_eq!(vm.stage, QuizStage::Loading);
        assert_eq!(vm.notice.unwrap().action, NoticeAction::Retry);
    }

    #[test]
    fn answering_every_served_question_is_out_of_questions() {
        let mut store = QuizStore::new(20);
        let request = store
            .dispatch(QuizEvent::Start(UserProfile::default()))
            .unwrap()
            .unwrap();
        let more = store
            .resolve(FetchResponse {
                generation: request.generation,
                kind: FetchKind::Initial,
                result: Ok(vec![question(1, "False")]),
            })
            .expect("one question is below the lookahead");
        let _ = store.resolve(FetchResponse {
            generation: more.generation,
            kind: FetchKind::More,
            result: Ok(Vec::new()),
        });
        assert!(store.is_exhausted());

        store
            .dispatch(QuizEvent::Answer {
                verdict: Verdict::Fake,
                elapsed_secs: 1,
            })
            .unwrap();
        store.dispatch(QuizEvent::Advance).unwrap();
        let vm = map_quiz(&store);
        assert_eq!(vm.stage, QuizStage::OutOfQuestions);
        assert_eq!(vm.notice.unwrap().action, NoticeAction::None);
    }

    #[test]
    fn double_answer_does_not_leak_into_the_next_question() {
        let mut store = started((1..=5).map(|id| question(id, "False")).collect());
        let wrong = QuizEvent::Answer {
            verdict: Verdict::Real,
            elapsed_secs: 2,
        };
        store.dispatch(wrong.clone()).unwrap();
        assert!(store.dispatch(wrong).is_err());
        store.dispatch(QuizEvent::Advance).unwrap();

        let vm = map_quiz(&store);
        assert_eq!(vm.question_number, 2);
        assert!(matches!(&vm.stage, QuizStage::Question(q) if q.summary == "claim 2"));
        assert_eq!(vm.hearts, vec![true, true, false]);
    }

    #[test]
    fn waiting_for_first_batch_is_loading() {
        let mut store = QuizStore::new(20);
        let _ = store
            .dispatch(QuizEvent::Start(UserProfile::default()))
            .unwrap();
        assert_eq!(map_quiz(&store).stage, QuizStage::Loading);
    }

    #[test]
    fn fetch_errors_offer_retry() {
        let notice = NoticeVm::from_issue(&SessionIssue::data_fetch("boom"));
        assert_eq!(notice.action, NoticeAction::Retry);
        assert_eq!(notice.message, "boom");
        let notice = NoticeVm::from_issue(&SessionIssue::NoContent { fatal: false });
        assert_eq!(notice.action, NoticeAction::None);
    }
}
