use url::Url;

use crate::model::question::Question;
use crate::model::rating::Verdict;

/// Record of one answered question, used for the post-quiz review.
///
/// Cards are only ever appended to a session's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCard {
    pub summary: String,
    pub verdict: Verdict,
    pub correct: bool,
    pub points: u32,
    pub rating: String,
    pub context: String,
    pub image_url: Option<Url>,
    pub article_url: Option<Url>,
    pub title: String,
}

impl AnswerCard {
    #[must_use]
    pub fn record(question: &Question, verdict: Verdict, correct: bool, points: u32) -> Self {
        Self {
            summary: question.summary().to_string(),
            verdict,
            correct,
            points,
            rating: question.rating().to_string(),
            context: question.context().to_string(),
            image_url: question.image_url().cloned(),
            article_url: question.article_url().cloned(),
            title: question.title().to_string(),
        }
    }
}
