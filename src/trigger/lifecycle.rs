//! Webhook registration lifecycle
//!
//! Registers and deregisters the host's callback URL against the remote
//! `/webhooks` endpoints. The remote-assigned webhook id lives in a
//! host-provided key-value store, so activation state survives the connector
//! itself. All three lifecycle steps swallow their own failures into a
//! boolean: a misbehaving remote registration must not crash the host's
//! activation flow.

use super::WebhookTopic;
use crate::http::PostscriptClient;
use crate::operations::simplify;
use crate::params::JsonObject;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

/// Storage key for the remote webhook id
pub const WEBHOOK_ID_KEY: &str = "webhookId";

/// Host-provided keyed persistence for per-node activation state
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Read a stored value
    async fn get(&self, key: &str) -> Option<String>;
    /// Store a value
    async fn set(&self, key: &str, value: String);
    /// Remove a value
    async fn delete(&self, key: &str);
}

/// Simple in-process store for tests and hosts without persistence
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryWebhookStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

/// One workflow's webhook registration against the remote API
pub struct WebhookRegistration<'a> {
    client: &'a PostscriptClient,
    store: &'a dyn WebhookStore,
    callback_url: String,
    topic: WebhookTopic,
}

impl<'a> WebhookRegistration<'a> {
    /// Create a registration handle for one callback URL and topic
    pub fn new(
        client: &'a PostscriptClient,
        store: &'a dyn WebhookStore,
        callback_url: impl Into<String>,
        topic: WebhookTopic,
    ) -> Self {
        Self {
            client,
            store,
            callback_url: callback_url.into(),
            topic,
        }
    }

    /// Check whether a registration for this URL and topic already exists
    /// remotely; when found, its id is re-stored locally.
    pub async fn check_exists(&self) -> bool {
        let response = match self.client.get("/webhooks").await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "webhook existence check failed");
                return false;
            }
        };

        let Value::Array(webhooks) = simplify(response) else {
            return false;
        };

        let found = webhooks.iter().find(|webhook| {
            webhook.get("url").and_then(Value::as_str) == Some(self.callback_url.as_str())
                && webhook.get("topic").and_then(Value::as_str) == Some(self.topic.as_str())
        });

        match found.and_then(webhook_id) {
            Some(id) => {
                self.store.set(WEBHOOK_ID_KEY, id).await;
                true
            }
            None => false,
        }
    }

    /// Register the callback URL for this topic and store the assigned id
    pub async fn create(&self) -> bool {
        let mut body = JsonObject::new();
        body.insert("url".to_string(), Value::String(self.callback_url.clone()));
        body.insert(
            "topic".to_string(),
            Value::String(self.topic.as_str().to_string()),
        );
        body.insert("format".to_string(), Value::String("json".to_string()));
        body.insert("active".to_string(), Value::Bool(true));

        let response = match self.client.post("/webhooks", body).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, topic = %self.topic, "webhook registration failed");
                return false;
            }
        };

        match webhook_id(&simplify(response)) {
            Some(id) => {
                self.store.set(WEBHOOK_ID_KEY, id).await;
                true
            }
            None => {
                warn!(topic = %self.topic, "webhook registration response carried no id");
                false
            }
        }
    }

    /// Deregister the stored webhook. No stored id means nothing to do and
    /// counts as success, so repeated deactivation stays idempotent.
    pub async fn delete(&self) -> bool {
        let Some(id) = self.store.get(WEBHOOK_ID_KEY).await else {
            return true;
        };

        match self.client.delete(&format!("/webhooks/{id}")).await {
            Ok(_) => {
                self.store.delete(WEBHOOK_ID_KEY).await;
                true
            }
            Err(err) => {
                warn!(error = %err, id, "webhook deregistration failed");
                false
            }
        }
    }
}

/// Remote webhook id as a string, tolerating numeric ids
fn webhook_id(webhook: &Value) -> Option<String> {
    match webhook.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}
