//! Webhook resource operations
//!
//! CRUD against the remote `/webhooks` endpoints. The managed trigger
//! lifecycle (register on activation, deregister on deactivation) lives in
//! the `trigger` module; these handlers are the direct, host-driven surface.

use super::{list, simplify, success, unsupported, Action, Resource};
use crate::error::Result;
use crate::http::PostscriptClient;
use crate::params::{JsonObject, ParamSource, Query};
use serde_json::Value;

pub(super) async fn execute(
    client: &PostscriptClient,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match action {
        Action::GetAll => list(client, "/webhooks", params, Query::new()).await,
        Action::Create => create(client, params).await,
        Action::Update => update(client, params).await,
        Action::Delete => delete(client, params).await,
        other => Err(unsupported(Resource::Webhook, other)),
    }
}

async fn create(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let url = params.string("url")?;
    let topic = params.string("topic")?;

    let mut body = JsonObject::new();
    body.insert("url".to_string(), Value::String(url));
    body.insert("topic".to_string(), Value::String(topic));
    body.insert("format".to_string(), Value::String("json".to_string()));
    body.extend(params.object_or_default("options"));

    let response = client.post("/webhooks", body).await?;
    Ok(simplify(response))
}

async fn update(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let webhook_id = params.string("webhookId")?;
    let update_fields = params.object_or_default("updateFields");

    let response = client
        .patch(&format!("/webhooks/{webhook_id}"), update_fields)
        .await?;
    Ok(simplify(response))
}

async fn delete(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let webhook_id = params.string("webhookId")?;
    client.delete(&format!("/webhooks/{webhook_id}")).await?;
    Ok(success())
}
