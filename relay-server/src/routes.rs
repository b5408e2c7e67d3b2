//! HTTP routes: the streaming chat endpoint plus liveness probes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chat_relay::ChatRelay;
use chat_types::ChatRequest;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared handler state; the relay itself is stateless across requests.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

/// CORS policy from configuration: an explicit origin list when configured,
/// permissive otherwise.
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring malformed allowed origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

async fn root() -> &'static str {
    "Memobase relay is running"
}

#[derive(Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// `POST /api/chat`: relays a streaming completion augmented with memory
/// context. Success is a `text/event-stream` body written chunk by chunk;
/// any failure before the first byte is a 500 with `{"error": ...}`.
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    info!(
        message_count = request.messages.len(),
        tool_count = request.tools.as_ref().map(|t| t.len()).unwrap_or(0),
        "POST /api/chat"
    );

    match state.relay.handle(request).await {
        Ok(stream) => (
            [(header::CONTENT_TYPE, "text/event-stream")],
            Body::from_stream(stream),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
