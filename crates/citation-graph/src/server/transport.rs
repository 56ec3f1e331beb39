//! HTTP transport.
//!
//! Serves the diagram client's action protocol over a WebSocket, a plain
//! JSON endpoint for one-off graph requests, and optionally the client's
//! static files.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::{SinkExt, StreamExt};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::ActionDispatcher;
use crate::config::Config;
use crate::models::{FilterSpec, RenderOptions};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub dispatcher: Arc<ActionDispatcher>,
}

/// Create the HTTP router.
pub fn create_router(dispatcher: Arc<ActionDispatcher>, config: &Config) -> Router {
    let state = Arc::new(HttpState { dispatcher });

    let graph_route = post(handle_graph).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(config.request_timeout)),
    );

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/graph", graph_route)
        .route("/websocket", get(handle_websocket));

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static client files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "citation-graph",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let dataset = state.dispatcher.generator().dataset();
    Json(serde_json::json!({
        "status": "ready",
        "service": "citation-graph",
        "version": env!("CARGO_PKG_VERSION"),
        "papers": dataset.len(),
        "rootId": dataset.root_id,
        "actions": state.dispatcher.kinds()
    }))
}

/// Handle POST /graph: a `FilterSpec` body, or an empty body for the full graph.
async fn handle_graph(State(state): State<Arc<HttpState>>, body: Bytes) -> Response {
    let filter = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<FilterSpec>(&body) {
            Ok(filter) => Some(filter),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected graph request");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": format!("Invalid filter: {e}") })),
                )
                    .into_response();
            }
        }
    };

    let graph = state.dispatcher.generator().generate(filter, RenderOptions::default()).await;

    match serde_json::to_vec(&*graph) {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize graph");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Graph request timed out".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Unhandled error: {err}"))
    }
}

/// Handle GET /websocket: upgrade and exchange action messages.
async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<HttpState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<HttpState>) {
    let connection_id = uuid::Uuid::new_v4();
    tracing::info!(%connection_id, "WebSocket connected");

    let (mut sender, mut receiver) = socket.split();

    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(%connection_id, error = %e, "WebSocket receive failed");
                break;
            }
        };

        for reply in state.dispatcher.dispatch_text(text.as_str()).await {
            if let Err(e) = sender.send(Message::Text(reply.into())).await {
                tracing::warn!(%connection_id, error = %e, "WebSocket send failed");
                return;
            }
        }
    }

    tracing::info!(%connection_id, "WebSocket disconnected");
}
