use std::sync::Arc;

use quiz_core::model::{DateRange, MIN_SUBJECT_OCCURRENCES, TagCount, count_tags};
use storage::repository::QuestionRepository;
use tracing::debug;

use crate::Clock;
use crate::error::QuestionSourceError;

/// Lists the subjects worth offering for a date range.
#[derive(Clone)]
pub struct SubjectCatalogService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
}

impl SubjectCatalogService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { clock, questions }
    }

    /// Tags seen more than `MIN_SUBJECT_OCCURRENCES` times, most common first.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::DataFetch` if the store cannot be read.
    pub async fn subjects(&self, range: DateRange) -> Result<Vec<TagCount>, QuestionSourceError> {
        let fields = self
            .questions
            .list_tag_fields(range.lower_bound(self.clock.now()))
            .await
            .map_err(QuestionSourceError::DataFetch)?;
        let subjects = count_tags(fields.iter().map(String::as_str), MIN_SUBJECT_OCCURRENCES);
        debug!(
            target: "quiz.source",
            range = %range,
            records = fields.len(),
            subjects = subjects.len(),
            "subject catalog built"
        );
        Ok(subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn counts_only_records_inside_the_range() {
        let repo = InMemoryRepository::new();
        let mut drafts = Vec::new();
        for id in 1..=11 {
            drafts.push(QuestionDraft {
                id,
                summary: "s".into(),
                title: format!("recent {id}"),
                tags: "['Politics', 'Health']".into(),
                published_at: Some(fixed_now() - Duration::days(3)),
                ..QuestionDraft::default()
            });
        }
        for id in 12..=40 {
            drafts.push(QuestionDraft {
                id,
                summary: "s".into(),
                title: format!("old {id}"),
                tags: "['Science']".into(),
                published_at: Some(fixed_now() - Duration::days(200)),
                ..QuestionDraft::default()
            });
        }
        repo.upsert_questions(&drafts).await.unwrap();
        let svc = SubjectCatalogService::new(fixed_clock(), Arc::new(repo));

        let month = svc.subjects(DateRange::Month).await.unwrap();
        let tags: Vec<&str> = month.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["Health", "Politics"]);

        let all = svc.subjects(DateRange::All).await.unwrap();
        assert_eq!(all[0].tag, "Science");
        assert_eq!(all[0].count, 29);
    }
}
