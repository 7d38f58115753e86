use std::sync::Arc;

use quiz_core::model::{DateRange, Question, QuestionId, TagFilter};
use rand::rng;
use rand::seq::SliceRandom;
use storage::repository::{QuestionQuery, QuestionRepository};
use tracing::{debug, warn};

use crate::Clock;
use crate::error::QuestionSourceError;

/// Questions requested per fetch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Pulls playable, shuffled batches out of the question store.
#[derive(Clone)]
pub struct QuestionSource {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { clock, questions }
    }

    /// Fetch up to `batch_size` unseen Fake/Real questions.
    ///
    /// Candidates match the tag filter and date range and are not in
    /// `exclude`. Ambiguous ratings and records that fail validation are
    /// dropped before shuffling. An empty batch is not an error.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::DataFetch` if the store cannot be read.
    pub async fn fetch_batch(
        &self,
        tag: &TagFilter,
        date_range: DateRange,
        batch_size: usize,
        exclude: &[QuestionId],
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let query = QuestionQuery {
            tag: tag.clone(),
            since: date_range.lower_bound(self.clock.now()),
            exclude: exclude.to_vec(),
        };

        let drafts = self.questions.query_questions(&query).await.map_err(|e| {
            warn!(target: "quiz.source", error = %e, "question query failed");
            QuestionSourceError::DataFetch(e)
        })?;
        let candidates = drafts.len();

        let mut playable: Vec<Question> = drafts
            .into_iter()
            .filter_map(|draft| {
                let id = draft.id;
                match draft.validate() {
                    Ok(question) => Some(question),
                    Err(e) => {
                        debug!(target: "quiz.source", id, error = %e, "skipping invalid record");
                        None
                    }
                }
            })
            .filter(|q| q.category().is_playable() && !exclude.contains(&q.id()))
            .collect();

        playable.shuffle(&mut rng());
        playable.truncate(batch_size);

        debug!(
            target: "quiz.source",
            tag = tag.as_str().unwrap_or(""),
            range = %date_range,
            candidates,
            served = playable.len(),
            "fetched batch"
        );
        Ok(playable)
    }
}
