//! Inbound payload shaping
//!
//! The raw POST body, headers, and query string all pass through to the
//! workflow unmodified, augmented with the configured topic and a
//! processing-time timestamp. Well-known body keys are additionally lifted
//! to the top level for convenient downstream access.

use super::WebhookTopic;
use crate::normalize::format_datetime;
use crate::params::JsonObject;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Body keys lifted to the top level of the emitted payload
const LIFTED_KEYS: [&str; 3] = ["subscriber", "message", "data"];

/// Shape one inbound delivery into the payload emitted to the workflow
pub fn shape_payload(
    topic: WebhookTopic,
    body: &Value,
    headers: &HashMap<String, String>,
    query: &HashMap<String, String>,
    received_at: DateTime<Utc>,
) -> Value {
    let mut payload = JsonObject::new();
    payload.insert("body".to_string(), body.clone());
    payload.insert("headers".to_string(), json!(headers));
    payload.insert("query".to_string(), json!(query));
    payload.insert(
        "event".to_string(),
        Value::String(topic.as_str().to_string()),
    );
    payload.insert(
        "receivedAt".to_string(),
        Value::String(format_datetime(received_at)),
    );

    if let Value::Object(map) = body {
        for key in LIFTED_KEYS {
            if let Some(value) = map.get(key) {
                payload.insert(key.to_string(), value.clone());
            }
        }
    }

    Value::Object(payload)
}

/// [`shape_payload`] stamped with the current time
pub fn shape_payload_now(
    topic: WebhookTopic,
    body: &Value,
    headers: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> Value {
    shape_payload(topic, body, headers, query, Utc::now())
}
