//! Keyword operations

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
        Action::GetAll => get_all(client, params).await,
        Action::Get => get(client, params).await,
        Action::Create => create(client, params).await,
        Action::Update => update(client, params).await,
        Action::Delete => delete(client, params).await,
        other => Err(unsupported(Resource::Keyword, other)),
    }
}

/// Turn a comma-separated `tag_ids` value into a proper array in place
fn split_tag_ids(body: &mut JsonObject) {
    if let Some(Value::String(tag_ids)) = body.get("tag_ids").cloned() {
        let split: Vec<Value> = tag_ids
            .split(',')
            .map(|t| Value::String(t.trim().to_string()))
            .collect();
        body.insert("tag_ids".to_string(), Value::Array(split));
    }
}

async fn get_all(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let filters = params.object_or_default("filters");
    let mut query = Query::new();
    if let Some(active) = filters.bool_opt("active") {
        query.insert("active".to_string(), active.to_string());
    }
    list(client, "/keywords", params, query).await
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let keyword_id = params.string("keywordId")?;
    let response = client.get(&format!("/keywords/{keyword_id}")).await?;
    Ok(simplify(response))
}

async fn create(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let keyword = params.string("keyword")?;
    let response_message = params.string("responseMessage")?;

    let mut body = JsonObject::new();
    body.insert("keyword".to_string(), Value::String(keyword));
    body.insert(
        "response_message".to_string(),
        Value::String(response_message),
    );
    body.extend(params.object_or_default("additionalFields"));
    split_tag_ids(&mut body);

    let response = client.post("/keywords", body).await?;
    Ok(simplify(response))
}

async fn update(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let keyword_id = params.string("keywordId")?;
    let mut update_fields = params.object_or_default("updateFields");
    split_tag_ids(&mut update_fields);

    let response = client
        .patch(&format!("/keywords/{keyword_id}"), update_fields)
        .await?;
    Ok(simplify(response))
}

async fn delete(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let keyword_id = params.string("keywordId")?;
    client.delete(&format!("/keywords/{keyword_id}")).await?;
    Ok(success())
}
