//! End-to-end tests of the HTTP surface with a fake completion provider.
//! Exercises the router directly via `tower::ServiceExt::oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chat_relay::{ChatRelay, RelayConfig};
use completion_client::{CompletionClient, CompletionRequest, StreamChunk, StreamChunkCallback};
use memory_mock::MockMemoryClient;
use relay_server::{build_router, AppState};
use tower::ServiceExt;

/// Completion client replaying canned chunks and counting invocations.
#[derive(Default)]
struct FakeCompletion {
    chunks: Vec<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn stream_completion(
        &self,
        _request: CompletionRequest,
        callback: &mut StreamChunkCallback,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut full = String::new();
        for (i, chunk) in self.chunks.iter().enumerate() {
            callback(StreamChunk {
                content: chunk.clone(),
                done: i + 1 == self.chunks.len(),
            })
            .await?;
            full.push_str(chunk);
        }
        Ok(full)
    }
}

fn full_config() -> RelayConfig {
    RelayConfig {
        static_user_id: Some("U".to_string()),
        model: Some("gpt-4o".to_string()),
        api_key: Some("sk-test".to_string()),
        ..RelayConfig::default()
    }
}

fn app_with(config: RelayConfig, completion: Arc<FakeCompletion>) -> axum::Router {
    let relay = Arc::new(ChatRelay::new(
        config,
        Arc::new(MockMemoryClient::new()),
        completion,
    ));
    build_router(AppState { relay }, relay_server::cors_layer(None))
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// **Test: a valid request streams every chunk back in order as text/event-stream.**
#[tokio::test]
async fn valid_request_streams_chunks() {
    let completion = Arc::new(FakeCompletion {
        chunks: vec!["Hel".to_string(), "lo".to_string(), " world".to_string()],
        ..FakeCompletion::default()
    });
    let app = app_with(full_config(), completion.clone());

    let response = app
        .oneshot(chat_request(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Hello world");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
}

/// **Test: a missing credential yields 500 with a JSON error naming the
/// setting, zero streamed bytes, and no completion call.**
#[tokio::test]
async fn missing_credential_returns_json_error() {
    let completion = Arc::new(FakeCompletion {
        chunks: vec!["never".to_string()],
        ..FakeCompletion::default()
    });
    let config = RelayConfig {
        api_key: None,
        ..full_config()
    };
    let app = app_with(config, completion.clone());

    let response = app
        .oneshot(chat_request(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["error"], "Missing OPENAI_API_KEY");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
}

/// **Test: unsupported methods on the chat path get 405.**
#[tokio::test]
async fn get_on_chat_path_is_method_not_allowed() {
    let app = app_with(full_config(), Arc::new(FakeCompletion::default()));
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/chat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

/// **Test: malformed request bodies are rejected with a client error.**
#[tokio::test]
async fn malformed_body_is_client_error() {
    let app = app_with(full_config(), Arc::new(FakeCompletion::default()));
    let response = app.oneshot(chat_request("{not json")).await.unwrap();
    assert!(response.status().is_client_error());
}

/// **Test: liveness routes answer without configuration.**
#[tokio::test]
async fn liveness_routes_respond() {
    let app = app_with(RelayConfig::default(), Arc::new(FakeCompletion::default()));
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
