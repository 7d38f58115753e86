use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    DateRange, LeaderboardEntry, NewScore, QuestionDraft, Subject, TagFilter, UserProfile,
    Username, Verdict,
};
use quiz_core::quiz::QuizEvent;
use quiz_core::time::fixed_now;
use storage::repository::{LeaderboardRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness};

fn profile() -> UserProfile {
    UserProfile::new(None, TagFilter::any(), DateRange::All)
}

async fn storage_with_questions(count: u64) -> Storage {
    let storage = Storage::in_memory();
    let drafts: Vec<QuestionDraft> = (1..=count)
        .map(|id| QuestionDraft {
            id,
            summary: format!("claim {id}"),
            rating: "False".into(),
            context: format!("context {id}"),
            title: format!("title {id}"),
            ..QuestionDraft::default()
        })
        .collect();
    storage.questions.upsert_questions(&drafts).await.unwrap();
    storage
}

#[tokio::test(flavor = "current_thread")]
async fn menu_view_smoke_renders_form_and_leaderboard() {
    let storage = Storage::in_memory();
    storage
        .leaderboard
        .insert_score(
            &NewScore {
                username: Username::new("ada").unwrap(),
                score: 2250,
                subject: Subject::all(),
            },
            fixed_now(),
        )
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Menu, storage, Vec::new()).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(html.contains("Last 3 Months"), "missing date ranges in {html}");
    assert!(html.contains("All Subjects"), "missing subject option in {html}");
    assert!(html.contains("ada"), "missing leaderboard row in {html}");
    assert!(html.contains("🏆"), "missing rank badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_current_question() {
    let storage = storage_with_questions(5).await;
    let mut harness =
        setup_view_harness(ViewKind::Quiz, storage, vec![QuizEvent::Start(profile())]).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Question 1"), "missing question number in {html}");
    assert!(html.contains("Current Score: 0"), "missing score in {html}");
    assert!(html.contains("claim "), "missing claim text in {html}");
    assert!(html.contains("Fake"), "missing fake button in {html}");
    assert!(html.contains("Real"), "missing real button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_feedback_after_answer() {
    let storage = storage_with_questions(5).await;
    let events = vec![
        QuizEvent::Start(profile()),
        QuizEvent::Answer {
            verdict: Verdict::Fake,
            elapsed_secs: 0,
        },
    ];
    let mut harness = setup_view_harness(ViewKind::Quiz, storage, events).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Correct!"), "missing verdict in {html}");
    assert!(html.contains("You scored 800 points!"), "missing points in {html}");
    assert!(html.contains("Continue"), "missing continue in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_no_content_notice() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz,
        Storage::in_memory(),
        vec![QuizEvent::Start(profile())],
    )
    .await;
    harness.rebuild();
    let html = harness.render();

    assert!(
        html.contains("No more unique questions available"),
        "missing notice in {html}"
    );
    assert!(html.contains("Back to Menu"), "missing menu action in {html}");
    assert!(!html.contains("View Results"), "nothing was answered in {html}");
    assert!(!html.contains("Loading questions"), "notice replaces loading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_review() {
    let storage = storage_with_questions(3).await;
    let events = vec![
        QuizEvent::Start(profile()),
        QuizEvent::Answer {
            verdict: Verdict::Fake,
            elapsed_secs: 0,
        },
        QuizEvent::Finish,
    ];
    let mut harness = setup_view_harness(ViewKind::Results, storage, events).await;
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Quiz Results"), "missing title in {html}");
    assert!(html.contains("Score: 800"), "missing score in {html}");
    assert!(html.contains("Question 1 - title"), "missing answer card in {html}");
    assert!(html.contains("Your answer was correct"), "missing outcome in {html}");
    assert!(html.contains("Submit Score"), "missing submit in {html}");
}

struct FailingLeaderboard;

#[async_trait::async_trait]
impl LeaderboardRepository for FailingLeaderboard {
    async fn insert_score(
        &self,
        _score: &NewScore,
        _created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn top_scores(
        &self,
        _limit: u32,
        _subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn menu_view_smoke_renders_leaderboard_error() {
    let mut storage = Storage::in_memory();
    storage.leaderboard = Arc::new(FailingLeaderboard);

    let mut harness = setup_view_harness(ViewKind::Menu, storage, Vec::new()).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("Failed to load leaderboard."),
        "missing error in {html}"
    );
}
