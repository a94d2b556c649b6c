//! Operation dispatch
//!
//! Maps a (resource, action) pair plus a host parameter bag onto one request
//! executor or paginator invocation and a response-shaping step. Handlers
//! live in one submodule per resource; this module owns the enums, the
//! descriptor type, and the shared list/shape helpers.

mod automation;
mod campaign;
mod event;
mod keyword;
mod message;
mod segment;
mod shop;
mod subscriber;
mod webhook;

use crate::error::{Error, Result};
use crate::http::PostscriptClient;
use crate::params::{JsonObject, ParamSource, Query};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[cfg(test)]
mod tests;

/// Domain nouns exposed by the Postscript API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Subscriber,
    Message,
    Keyword,
    Campaign,
    Automation,
    Segment,
    Event,
    Shop,
    Webhook,
}

impl Resource {
    /// Wire name of the resource
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Subscriber => "subscriber",
            Resource::Message => "message",
            Resource::Keyword => "keyword",
            Resource::Campaign => "campaign",
            Resource::Automation => "automation",
            Resource::Segment => "segment",
            Resource::Event => "event",
            Resource::Shop => "shop",
            Resource::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbs applicable to resources.
///
/// One flat enum; which combinations are valid is decided by the per-resource
/// handlers, and invalid pairs fail before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Get,
    GetAll,
    GetByPhone,
    Create,
    Update,
    Delete,
    Unsubscribe,
    AddTag,
    RemoveTag,
    UpdateProperties,
    Send,
    #[serde(rename = "sendMMS")]
    SendMms,
    GetStats,
    Schedule,
    Trigger,
    Enable,
    Disable,
    GetSubscribers,
    GetCount,
    Track,
    TrackEcommerce,
    GetTypes,
    GetComplianceSettings,
}

impl Action {
    /// Wire name of the action
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::GetAll => "getAll",
            Action::GetByPhone => "getByPhone",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Unsubscribe => "unsubscribe",
            Action::AddTag => "addTag",
            Action::RemoveTag => "removeTag",
            Action::UpdateProperties => "updateProperties",
            Action::Send => "send",
            Action::SendMms => "sendMMS",
            Action::GetStats => "getStats",
            Action::Schedule => "schedule",
            Action::Trigger => "trigger",
            Action::Enable => "enable",
            Action::Disable => "disable",
            Action::GetSubscribers => "getSubscribers",
            Action::GetCount => "getCount",
            Action::Track => "track",
            Action::TrackEcommerce => "trackEcommerce",
            Action::GetTypes => "getTypes",
            Action::GetComplianceSettings => "getComplianceSettings",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical operation: resource, action, and the host-collected parameters
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub resource: Resource,
    pub action: Action,
    pub params: JsonObject,
}

impl OperationDescriptor {
    /// Create a descriptor from its parts
    pub fn new(resource: Resource, action: Action, params: JsonObject) -> Self {
        Self {
            resource,
            action,
            params,
        }
    }
}

/// Execute one operation described by a descriptor
pub async fn dispatch(client: &PostscriptClient, descriptor: &OperationDescriptor) -> Result<Value> {
    execute(
        client,
        descriptor.resource,
        descriptor.action,
        &descriptor.params,
    )
    .await
}

/// Execute one operation with an explicit parameter source
pub async fn execute(
    client: &PostscriptClient,
    resource: Resource,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match resource {
        Resource::Subscriber => subscriber::execute(client, action, params).await,
        Resource::Message => message::execute(client, action, params).await,
        Resource::Keyword => keyword::execute(client, action, params).await,
        Resource::Campaign => campaign::execute(client, action, params).await,
        Resource::Automation => automation::execute(client, action, params).await,
        Resource::Segment => segment::execute(client, action, params).await,
        Resource::Event => event::execute(client, action, params).await,
        Resource::Shop => shop::execute(client, action, params).await,
        Resource::Webhook => webhook::execute(client, action, params).await,
    }
}

/// Unwrap the `data` envelope when present, otherwise pass the body through
pub fn simplify(mut response: Value) -> Value {
    if let Value::Object(map) = &mut response {
        if let Some(data) = map.remove("data") {
            return data;
        }
    }
    response
}

/// Synthetic body for delete-style operations with no useful response
pub(crate) fn success() -> Value {
    json!({"success": true})
}

/// Failure for a (resource, action) pair no handler covers
pub(crate) fn unsupported(resource: Resource, action: Action) -> Error {
    Error::invalid_argument(format!(
        "The operation \"{action}\" is not supported for resource \"{resource}\""
    ))
}

/// Shared list handler: full pagination when `returnAll` is set, otherwise a
/// single page capped by `limit` (default 50).
pub(crate) async fn list(
    client: &PostscriptClient,
    endpoint: &str,
    params: &dyn ParamSource,
    base_query: Query,
) -> Result<Value> {
    if params.bool_or("returnAll", false) {
        let items = client
            .fetch_all(Method::GET, endpoint, JsonObject::new(), base_query, "data")
            .await?;
        Ok(Value::Array(items))
    } else {
        let mut query = base_query;
        query.insert(
            "limit".to_string(),
            params.integer_or("limit", 50).to_string(),
        );
        let response = client.get_query(endpoint, query).await?;
        Ok(simplify(response))
    }
}
