//! Inbound webhook receiver
//!
//! A single `POST /webhook` route the host mounts under its per-workflow
//! webhook namespace. Deliveries are shaped and forwarded to the host over a
//! channel; the remote gets an immediate acknowledgement.

use super::payload::shape_payload_now;
use super::WebhookTopic;
use crate::error::Result;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
struct ReceiverState {
    topic: WebhookTopic,
    emit: mpsc::Sender<Value>,
}

/// Build the receiver router. Shaped payloads are sent on `emit`.
pub fn router(topic: WebhookTopic, emit: mpsc::Sender<Value>) -> Router {
    Router::new()
        .route("/webhook", post(receive))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(ReceiverState { topic, emit }))
}

/// Bind and serve the receiver until the task is dropped
pub async fn serve(addr: SocketAddr, topic: WebhookTopic, emit: mpsc::Sender<Value>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, topic = %topic, "webhook receiver listening");
    axum::serve(listener, router(topic, emit)).await?;
    Ok(())
}

async fn receive(
    State(state): State<Arc<ReceiverState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    // Deliveries are passed through even when the body is not valid JSON.
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));

    let header_map: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let payload = shape_payload_now(state.topic, &body, &header_map, &query);

    if state.emit.send(payload).await.is_err() {
        warn!("webhook consumer dropped; delivery discarded");
    }

    Json(json!({"success": true}))
}
