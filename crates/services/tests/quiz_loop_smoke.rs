use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{DateRange, QuestionDraft, TagFilter, UserProfile, Verdict};
use quiz_core::quiz::{GamePhase, QuizEvent, SessionIssue};
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, QuestionSource, QuizLoopService};
use storage::repository::{
    InMemoryRepository, QuestionQuery, QuestionRepository, StorageError,
};

fn draft(id: u64, rating: &str) -> QuestionDraft {
    QuestionDraft {
        id,
        summary: format!("claim {id}"),
        rating: rating.to_string(),
        context: format!("context {id}"),
        title: format!("title {id}"),
        published_at: Some(fixed_now()),
        tags: "['Politics']".into(),
        ..QuestionDraft::default()
    }
}

async fn seeded_repo(fakes: u64, mixtures: u64) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    let mut drafts: Vec<QuestionDraft> = (1..=fakes).map(|id| draft(id, "False")).collect();
    drafts.extend((fakes + 1..=fakes + mixtures).map(|id| draft(id, "Mixture")));
    repo.upsert_questions(&drafts).await.unwrap();
    repo
}

fn loop_over(repo: Arc<dyn QuestionRepository>) -> QuizLoopService {
    let source = Arc::new(QuestionSource::new(Clock::fixed(fixed_now()), repo));
    QuizLoopService::new(source, 20)
}

fn profile() -> UserProfile {
    UserProfile::new(None, TagFilter::any(), DateRange::All)
}

/// Wraps the in-memory store and fails question reads while the switch is on.
#[derive(Clone)]
struct FlakyQuestions {
    inner: InMemoryRepository,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl QuestionRepository for FlakyQuestions {
    async fn query_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("store offline".into()));
        }
        self.inner.query_questions(query).await
    }

    async fn list_tag_fields(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, StorageError> {
        self.inner.list_tag_fields(since).await
    }

    async fn upsert_questions(&self, drafts: &[QuestionDraft]) -> Result<usize, StorageError> {
        self.inner.upsert_questions(drafts).await
    }
}

#[tokio::test]
async fn full_session_never_repeats_a_question() {
    let repo = seeded_repo(25, 3).await;
    let quiz = loop_over(Arc::new(repo));
    let mut store = quiz.new_store();

    quiz.dispatch(&mut store, QuizEvent::Start(profile())).await.unwrap();
    assert_eq!(store.state().phase(), GamePhase::Quiz);
    assert_eq!(store.state().questions().len(), 20);
    assert!(!store.is_fetching());

    for _ in 0..25 {
        quiz.dispatch(
            &mut store,
            QuizEvent::Answer {
                verdict: Verdict::Fake,
                elapsed_secs: 0,
            },
        )
        .await
        .unwrap();
        quiz.dispatch(&mut store, QuizEvent::Advance).await.unwrap();
    }

    let state = store.state();
    assert_eq!(state.questions().len(), 25);
    let unique: BTreeSet<_> = state.questions().iter().map(|q| q.id()).collect();
    assert_eq!(unique.len(), 25);
    assert!(state.questions().iter().all(|q| q.id().value() <= 25));
    assert!(store.is_exhausted());
    assert_eq!(state.error(), Some(&SessionIssue::NoContent { fatal: false }));
    assert_eq!(state.current_index(), 25);
    assert_eq!(state.score(), 25 * 800);
    assert_eq!(state.lives(), 3);

    quiz.dispatch(&mut store, QuizEvent::Finish).await.unwrap();
    assert_eq!(store.state().phase(), GamePhase::Results);
    assert_eq!(store.state().answer_cards().len(), 25);
}

#[tokio::test]
async fn empty_store_is_fatal_for_the_session() {
    let quiz = loop_over(Arc::new(InMemoryRepository::new()));
    let mut store = quiz.new_store();

    quiz.dispatch(&mut store, QuizEvent::Start(profile())).await.unwrap();

    let issue = store.state().error().cloned().unwrap();
    assert!(issue.is_fatal());
    assert!(store.state().questions().is_empty());
    assert!(store.is_exhausted());
    assert!(store.retry().is_none());
}

#[tokio::test]
async fn failed_fetch_surfaces_and_retry_recovers() {
    let failing = Arc::new(AtomicBool::new(true));
    let repo = FlakyQuestions {
        inner: seeded_repo(30, 0).await,
        failing: Arc::clone(&failing),
    };
    let quiz = loop_over(Arc::new(repo));
    let mut store = quiz.new_store();

    quiz.dispatch(&mut store, QuizEvent::Start(profile())).await.unwrap();
    let issue = store.state().error().cloned().unwrap();
    assert_eq!(issue.message(), "Failed to fetch fact checks from the database.");
    assert!(!issue.is_fatal());
    assert!(!store.is_fetching());
    assert!(!store.is_exhausted());

    failing.store(false, Ordering::SeqCst);
    let request = store.retry();
    assert!(request.is_some());
    quiz.drive(&mut store, request).await;

    assert_eq!(store.state().error(), None);
    assert_eq!(store.state().questions().len(), 20);
}

#[tokio::test]
async fn responses_from_an_abandoned_session_are_dropped() {
    let repo = seeded_repo(30, 0).await;
    let quiz = loop_over(Arc::new(repo));
    let mut store = quiz.new_store();

    let abandoned = store
        .dispatch(QuizEvent::Start(profile()))
        .unwrap()
        .unwrap();
    store.dispatch(QuizEvent::Restart).unwrap();
    let current = store
        .dispatch(QuizEvent::Start(profile()))
        .unwrap()
        .unwrap();
    assert_ne!(abandoned.generation, current.generation);

    let late = quiz.fulfil(&abandoned).await;
    assert!(store.resolve(late).is_none());
    assert!(store.state().questions().is_empty());
    assert!(store.is_fetching());

    quiz.drive(&mut store, Some(current)).await;
    assert_eq!(store.state().questions().len(), 20);
    assert!(!store.is_fetching());
}

#[tokio::test]
async fn app_services_share_one_store() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()));

    let email = services
        .email_capture()
        .capture("player@example.com")
        .await
        .unwrap();
    assert_eq!(services.email_capture().remembered().await, Some(email));

    services
        .leaderboard()
        .submit("player", 1200, &TagFilter::new("Politics"))
        .await
        .unwrap();
    let top = services.leaderboard().top(None).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].subject.as_str(), "Politics");

    let mut store = services.quiz_loop().new_store();
    services
        .quiz_loop()
        .dispatch(&mut store, QuizEvent::Start(profile()))
        .await
        .unwrap();
    assert!(store.state().error().is_some_and(SessionIssue::is_fatal));
}
