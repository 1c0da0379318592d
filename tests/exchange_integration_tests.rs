use std::sync::Arc;

use heartchat::core::action::{Action, Effect, update};
use heartchat::core::composer::Composer;
use heartchat::core::conversation::Sender;
use heartchat::core::history::{HistoryCache, HistoryStore, JsonFileStore};
use heartchat::core::state::App;
use heartchat::exchange::{ChatBackend, ExchangeClient, ExchangeError, FALLBACK_REPLY, HttpBackend};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

async fn mock_chat(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn client_for(uri: &str) -> ExchangeClient {
    ExchangeClient::new(Arc::new(HttpBackend::new(uri)))
}

// ============================================================================
// HTTP Backend Tests
// ============================================================================

#[tokio::test]
async fn test_chat_sends_message_and_returns_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "hi there",
            "timestamp": "2026-10-17T12:00:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let reply = backend.send("hello").await.expect("reply");
    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn test_reply_without_timestamp_is_accepted() {
    let mock_server = MockServer::start().await;
    mock_chat(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({ "response": "hey 💕" })),
    )
    .await;

    let reply = client_for(&mock_server.uri()).exchange("hello").await;
    assert_eq!(reply.content, "hey 💕");
    assert!(!reply.is_error);
}

#[tokio::test]
async fn test_server_error_maps_to_status_error() {
    let mock_server = MockServer::start().await;
    mock_chat(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let backend = HttpBackend::new(mock_server.uri());
    match backend.send("hello").await {
        Err(ExchangeError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal Server Error"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_collapses_to_fallback() {
    let mock_server = MockServer::start().await;
    mock_chat(&mock_server, ResponseTemplate::new(503)).await;

    let reply = client_for(&mock_server.uri()).exchange("hello").await;
    assert!(reply.is_error);
    assert_eq!(reply.content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    mock_chat(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({ "reply": "wrong field" })),
    )
    .await;

    let backend = HttpBackend::new(mock_server.uri());
    assert!(matches!(
        backend.send("hello").await,
        Err(ExchangeError::Parse(_))
    ));
    let reply = client_for(&mock_server.uri()).exchange("hello").await;
    assert_eq!(reply.content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 1
    let backend = HttpBackend::new("http://127.0.0.1:1");
    assert!(matches!(
        backend.send("hello").await,
        Err(ExchangeError::Network(_))
    ));
    let reply = client_for("http://127.0.0.1:1").exchange("hello").await;
    assert!(reply.is_error);
}

#[tokio::test]
async fn test_status_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "online",
            "message": "I'm here for you 💕"
        })))
        .mount(&mock_server)
        .await;

    let status = client_for(&mock_server.uri())
        .status()
        .await
        .expect("status");
    assert!(status.is_online());
    assert_eq!(status.message, "I'm here for you 💕");

    assert!(client_for("http://127.0.0.1:1").status().await.is_none());
}

// ============================================================================
// End-to-end through the reducer
// ============================================================================

#[tokio::test]
async fn test_hello_round_trip_through_reducer() {
    let mock_server = MockServer::start().await;
    mock_chat(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({ "response": "hi there" })),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.json");
    let mut app = App::new(
        Arc::new(HttpBackend::new(mock_server.uri())),
        Composer::default(),
        HistoryCache::new(Box::new(JsonFileStore::new(&history_path)), true, 5),
    );

    app.composer.update_draft("hello");
    let Effect::SpawnExchange { prompt, generation } = update(&mut app, Action::Submit) else {
        panic!("submit should spawn an exchange");
    };
    assert!(!app.can_submit());

    let reply = app.exchange.exchange(&prompt).await;
    let resolved = Action::ExchangeResolved {
        generation,
        prompt,
        reply,
    };
    let effect = update(&mut app, resolved);
    assert_eq!(effect, Effect::ReplyHearts);

    let messages = app.conversation.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[1].content, "hi there");
    assert!(!app.is_typing);

    let saved = JsonFileStore::new(&history_path).load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].user_message, "hello");
    assert_eq!(saved[0].assistant_reply, "hi there");
}

#[tokio::test]
async fn test_failed_round_trip_shows_fallback_and_records_nothing() {
    let mock_server = MockServer::start().await;
    mock_chat(&mock_server, ResponseTemplate::new(500)).await;

    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.json");
    let mut app = App::new(
        Arc::new(HttpBackend::new(mock_server.uri())),
        Composer::default(),
        HistoryCache::new(Box::new(JsonFileStore::new(&history_path)), true, 5),
    );

    app.composer.update_draft("hello");
    let Effect::SpawnExchange { prompt, generation } = update(&mut app, Action::Submit) else {
        panic!("submit should spawn an exchange");
    };
    let reply = app.exchange.exchange(&prompt).await;
    let resolved = Action::ExchangeResolved {
        generation,
        prompt,
        reply,
    };
    assert_eq!(update(&mut app, resolved), Effect::None);

    let last = app.conversation.last().unwrap();
    assert!(last.is_error);
    assert_eq!(last.content, FALLBACK_REPLY);
    assert!(!app.is_typing);
    assert!(!history_path.exists());
}
