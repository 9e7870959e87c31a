mod common;

use axum::http::StatusCode;
use common::{post_json, TestState};
use finsite_service::services::MockChatProvider;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn chat_relays_reply() {
    let (status, body) = post_json(
        TestState::new().router(),
        "/api/chat",
        json!({
            "message": "What is an index fund?",
            "history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "Hello!"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Mock response for: What is an index fund?");
}

#[tokio::test]
async fn missing_message_is_bad_request() {
    let (status, body) = post_json(TestState::new().router(), "/api/chat", json!({"message": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn oversized_message_fails_validation() {
    let (status, _) = post_json(
        TestState::new().router(),
        "/api/chat",
        json!({"message": "x".repeat(5000)}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_reply_is_bad_gateway() {
    let app = TestState::new()
        .chat(Arc::new(MockChatProvider::with_reply("   ")))
        .router();

    let (status, _) = post_json(app, "/api/chat", json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn provider_failure_is_generic_500() {
    let app = TestState::new()
        .chat(Arc::new(MockChatProvider::new(false)))
        .router();

    let (status, body) = post_json(app, "/api/chat", json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get chat response");
}
