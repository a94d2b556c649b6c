//! Segment operations

use super::{list, simplify, unsupported, Action, Resource};
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
        Action::GetAll => list(client, "/segments", params, Query::new()).await,
        Action::Get => get(client, params).await,
        Action::Create => create(client, params).await,
        Action::GetSubscribers => get_subscribers(client, params).await,
        Action::GetCount => get_count(client, params).await,
        other => Err(unsupported(Resource::Segment, other)),
    }
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let segment_id = params.string("segmentId")?;
    let response = client.get(&format!("/segments/{segment_id}")).await?;
    Ok(simplify(response))
}

async fn create(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let name = params.string("name")?;
    let conditions = params.object_or_default("conditions");
    let options = params.object_or_default("options");

    let match_type = options
        .string_opt("matchType")
        .unwrap_or_else(|| "all".to_string());

    let mut body = JsonObject::new();
    body.insert("name".to_string(), Value::String(name));
    body.insert("match_type".to_string(), Value::String(match_type));

    // The host collects conditions as a fixed list of {field, operator, value}
    // rows; only those three keys go on the wire.
    if let Some(Value::Array(rows)) = conditions.get("conditionValues") {
        let wire_conditions: Vec<Value> = rows
            .iter()
            .filter_map(Value::as_object)
            .map(|row| {
                let mut condition = JsonObject::new();
                for key in ["field", "operator", "value"] {
                    if let Some(value) = row.get(key) {
                        condition.insert(key.to_string(), value.clone());
                    }
                }
                Value::Object(condition)
            })
            .collect();
        body.insert("conditions".to_string(), Value::Array(wire_conditions));
    }

    let response = client.post("/segments", body).await?;
    Ok(simplify(response))
}

async fn get_subscribers(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let segment_id = params.string("segmentId")?;
    list(
        client,
        &format!("/segments/{segment_id}/subscribers"),
        params,
        Query::new(),
    )
    .await
}

async fn get_count(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let segment_id = params.string("segmentId")?;
    let response = client.get(&format!("/segments/{segment_id}/count")).await?;
    Ok(simplify(response))
}
