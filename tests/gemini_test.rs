use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use bfhl::config::GeminiConfig;
use bfhl::provider::gemini::GeminiProvider;
use bfhl::provider::{AnswerProvider, ProviderError};

const PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn provider(server: &MockServer, timeout: Duration) -> GeminiProvider {
    GeminiProvider::new(GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        base_url: server.url("/v1beta"),
        timeout,
    })
    .unwrap()
}

#[tokio::test]
async fn answers_from_first_candidate() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("x-goog-api-key", "test-key");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "Tokyo\n"}]}}],
                "usageMetadata": {"promptTokenCount": 17, "candidatesTokenCount": 2}
            }));
        })
        .await;

    let answer = provider(&server, Duration::from_secs(5))
        .answer("Capital of Japan?")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(answer, "Tokyo");
}

#[tokio::test]
async fn error_status_carries_provider_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(400)
                .json_body(json!({"error": {"code": 400, "message": "API key not valid"}}));
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .answer("anything")
        .await
        .unwrap_err();
    assert_eq!(err, ProviderError::Unavailable("API key not valid".to_string()));
}

#[tokio::test]
async fn error_status_without_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(503).body("upstream down");
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .answer("anything")
        .await
        .unwrap_err();
    assert_eq!(err, ProviderError::Unavailable("Unknown error".to_string()));
}

#[tokio::test]
async fn response_without_text_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .json_body(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .answer("anything")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .answer("anything")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"text": "late"}));
        })
        .await;

    let err = provider(&server, Duration::from_millis(200))
        .answer("anything")
        .await
        .unwrap_err();
    assert_eq!(err, ProviderError::Timeout);
}

#[tokio::test]
async fn unreachable_provider() {
    let config = GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        // port 9 (discard) is essentially never listening
        base_url: "http://127.0.0.1:9/v1beta".to_string(),
        timeout: Duration::from_secs(2),
    };
    let err = GeminiProvider::new(config)
        .unwrap()
        .answer("anything")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Unavailable(_) | ProviderError::Timeout
    ));
}
