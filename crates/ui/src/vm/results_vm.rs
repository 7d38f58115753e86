use quiz_core::model::{AnswerCard, Subject};
use quiz_core::quiz::QuizState;

use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub email: Option<String>,
    pub score: u32,
    pub total_time: String,
    pub correct: usize,
    pub answered: usize,
    pub subject: String,
    pub cards: Vec<AnswerCardVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerCardVm {
    pub heading: String,
    pub summary: String,
    pub statement: String,
    pub outcome: &'static str,
    pub correct: bool,
    pub points: u32,
    pub context: String,
    pub article_url: Option<String>,
    pub image_url: Option<String>,
}

#[must_use]
pub fn map_answer_card(index: usize, card: &AnswerCard) -> AnswerCardVm {
    let heading = if card.title.is_empty() {
        format!("Question {}", index + 1)
    } else {
        format!("Question {} - {}", index + 1, card.title)
    };
    AnswerCardVm {
        heading,
        summary: card.summary.clone(),
        statement: format!("The statement is {}", card.rating.trim()),
        outcome: if card.correct {
            "Your answer was correct"
        } else {
            "Your answer was incorrect"
        },
        correct: card.correct,
        points: card.points,
        context: card.context.clone(),
        article_url: card.article_url.as_ref().map(ToString::to_string),
        image_url: card.image_url.as_ref().map(ToString::to_string),
    }
}

#[must_use]
pub fn map_results(state: &QuizState) -> ResultsVm {
    let profile = state.profile();
    ResultsVm {
        email: profile.email.as_ref().map(ToString::to_string),
        score: state.score(),
        total_time: format_elapsed(state.total_time_secs()),
        correct: state.correct_answers(),
        answered: state.answer_cards().len(),
        subject: Subject::for_filter(&profile.tag).to_string(),
        cards: state
            .answer_cards()
            .iter()
            .enumerate()
            .map(|(index, card)| map_answer_card(index, card))
            .collect(),
    }
}

/// Progress of the leaderboard submit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Failed(String),
}

impl SubmitStatus {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Submitting => Some("Submitting..."),
            Self::Submitted => Some("Score submitted successfully!"),
            Self::Failed(message) => Some(message),
        }
    }

    /// A score is only submitted once per session.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}
