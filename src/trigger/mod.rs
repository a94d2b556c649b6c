//! Webhook trigger
//!
//! Everything needed to start workflows from Postscript events: the topic
//! enumeration, the registration lifecycle against the remote `/webhooks`
//! endpoints, inbound payload shaping, and an axum receiver the host mounts
//! under its per-workflow webhook namespace.

mod lifecycle;
mod payload;
mod server;

pub use lifecycle::{InMemoryWebhookStore, WebhookRegistration, WebhookStore, WEBHOOK_ID_KEY};
pub use payload::{shape_payload, shape_payload_now};
pub use server::{router, serve};

use serde::{Deserialize, Serialize};


/// Events a webhook subscription can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookTopic {
    #[serde(rename = "subscriber.subscribed")]
    SubscriberSubscribed,
    #[serde(rename = "subscriber.unsubscribed")]
    SubscriberUnsubscribed,
    #[serde(rename = "message.sent")]
    MessageSent,
    #[serde(rename = "message.delivered")]
    MessageDelivered,
    #[serde(rename = "message.failed")]
    MessageFailed,
    #[serde(rename = "message.clicked")]
    MessageClicked,
    #[serde(rename = "message.replied")]
    MessageReplied,
}

impl WebhookTopic {
    /// All topics, in display order
    pub fn all() -> [WebhookTopic; 7] {
        [
            WebhookTopic::SubscriberSubscribed,
            WebhookTopic::SubscriberUnsubscribed,
            WebhookTopic::MessageSent,
            WebhookTopic::MessageDelivered,
            WebhookTopic::MessageFailed,
            WebhookTopic::MessageClicked,
            WebhookTopic::MessageReplied,
        ]
    }

    /// Wire name of the topic
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookTopic::SubscriberSubscribed => "subscriber.subscribed",
            WebhookTopic::SubscriberUnsubscribed => "subscriber.unsubscribed",
            WebhookTopic::MessageSent => "message.sent",
            WebhookTopic::MessageDelivered => "message.delivered",
            WebhookTopic::MessageFailed => "message.failed",
            WebhookTopic::MessageClicked => "message.clicked",
            WebhookTopic::MessageReplied => "message.replied",
        }
    }
}

impl std::fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
