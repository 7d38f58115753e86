// Remote store against a local stub of the REST endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use quiz_core::model::{EmailAddress, QuestionId, TagFilter};
use quiz_core::time::fixed_now;
use storage::remote::{RemoteConfig, RemoteStore};
use storage::repository::{
    LeaderboardRepository, QuestionQuery, QuestionRepository, StorageError, SubscriberRepository,
};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<String>>>;

async fn failing_questions(State(seen): State<Seen>, RawQuery(query): RawQuery) -> impl IntoResponse {
    seen.lock().unwrap().push(query.unwrap_or_default());
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn garbled_leaderboard() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "not json",
    )
}

async fn conflicting_subscriber() -> impl IntoResponse {
    (StatusCode::CONFLICT, "duplicate")
}

async fn start_stub() -> (RemoteStore, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/rest/v1/questions", get(failing_questions))
        .route("/rest/v1/leaderboard", get(garbled_leaderboard))
        .route("/rest/v1/email_subscribers", post(conflicting_subscriber))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let config = RemoteConfig::new(&format!("http://127.0.0.1:{port}"), "test-key").unwrap();
    (RemoteStore::new(config), seen)
}

fn tags_param(raw: &str) -> Option<String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == "Tags")
        .map(|(_, value)| value.into_owned())
}

#[tokio::test]
async fn server_error_maps_to_connection_error() {
    let (store, _) = start_stub().await;
    let err = store
        .query_questions(&QuestionQuery::default())
        .await
        .unwrap_err();
    assert!(
        matches!(&err, StorageError::Connection(message) if message.contains("500")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_maps_to_serialization_error() {
    let (store, _) = start_stub().await;
    let err = store.top_scores(10, None).await.unwrap_err();
    assert!(
        matches!(err, StorageError::Serialization(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn conflict_status_maps_to_conflict() {
    let (store, _) = start_stub().await;
    let email = EmailAddress::parse("ada@example.org").unwrap();
    let err = store.upsert_email(&email, fixed_now()).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict), "unexpected error: {err:?}");
}

#[tokio::test]
async fn tag_filter_reaches_the_server_escaped() {
    let (store, seen) = start_stub().await;
    let query = QuestionQuery {
        tag: TagFilter::new("50%_off"),
        since: None,
        exclude: vec![QuestionId::new(3)],
    };
    let _ = store.query_questions(&query).await;

    let recorded = seen.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(tags_param(&recorded[0]).as_deref(), Some(r"ilike.*50\%\_off*"));
}
