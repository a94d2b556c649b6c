//! Subscriber operations

use super::{list, simplify, success, unsupported, Action, Resource};
use crate::error::{Error, Result};
use crate::http::PostscriptClient;
use crate::normalize::{normalize_phone_number, subscriber_query};
use crate::params::{JsonObject, ParamSource, Query};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

// Path-segment encoding matching JS encodeURIComponent: unreserved marks stay.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(super) async fn execute(
    client: &PostscriptClient,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match action {
        Action::GetAll => get_all(client, params).await,
        Action::Get => get(client, params).await,
        Action::GetByPhone => get_by_phone(client, params).await,
        Action::Create => create(client, params).await,
        Action::Update => update(client, params).await,
        Action::Unsubscribe => unsubscribe(client, params).await,
        Action::AddTag => add_tag(client, params).await,
        Action::RemoveTag => remove_tag(client, params).await,
        Action::UpdateProperties => update_properties(client, params).await,
        other => Err(unsupported(Resource::Subscriber, other)),
    }
}

async fn get_all(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let filters = params.object_or_default("filters");
    let query = subscriber_query(&filters)?;
    list(client, "/subscribers", params, query).await
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let response = client.get(&format!("/subscribers/{subscriber_id}")).await?;
    Ok(simplify(response))
}

async fn get_by_phone(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let phone = normalize_phone_number(&params.string("phoneNumber")?)?;
    let mut query = Query::new();
    query.insert("phone_number".to_string(), phone);
    let response = client.get_query("/subscribers/search", query).await?;
    Ok(simplify(response))
}

async fn create(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let phone = normalize_phone_number(&params.string("phoneNumber")?)?;
    let keyword_id = params.string("keywordId")?;

    let mut body = JsonObject::new();
    body.insert("phone_number".to_string(), Value::String(phone));
    body.insert("keyword_id".to_string(), Value::String(keyword_id));
    body.extend(params.object_or_default("additionalFields"));

    // A comma-separated tag list becomes a proper array on the wire.
    if let Some(Value::String(tags)) = body.get("tags").cloned() {
        let split: Vec<Value> = tags
            .split(',')
            .map(|t| Value::String(t.trim().to_string()))
            .collect();
        body.insert("tags".to_string(), Value::Array(split));
    }

    if let Some(Value::String(raw)) = body.get("properties").cloned() {
        let parsed: Value = serde_json::from_str(&raw).map_err(|e| {
            Error::invalid_argument(format!("Subscriber properties are not valid JSON: {e}"))
        })?;
        body.insert("properties".to_string(), parsed);
    }

    let response = client.post("/subscribers", body).await?;
    Ok(simplify(response))
}

async fn update(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let mut update_fields = params.object_or_default("updateFields");

    if let Some(Value::String(phone)) = update_fields.get("phone_number").cloned() {
        let normalized = normalize_phone_number(&phone)?;
        update_fields.insert("phone_number".to_string(), Value::String(normalized));
    }

    let response = client
        .patch(&format!("/subscribers/{subscriber_id}"), update_fields)
        .await?;
    Ok(simplify(response))
}

async fn unsubscribe(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let response = client
        .post(
            &format!("/subscribers/{subscriber_id}/unsubscribe"),
            JsonObject::new(),
        )
        .await?;
    Ok(simplify(response))
}

async fn add_tag(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let tag = params.string("tagName")?;

    let mut body = JsonObject::new();
    body.insert("tag".to_string(), Value::String(tag));

    let response = client
        .post(&format!("/subscribers/{subscriber_id}/tags"), body)
        .await?;
    Ok(simplify(response))
}

async fn remove_tag(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let tag = params.string("tagName")?;
    let encoded = utf8_percent_encode(&tag, PATH_SEGMENT);

    client
        .delete(&format!("/subscribers/{subscriber_id}/tags/{encoded}"))
        .await?;
    Ok(success())
}

async fn update_properties(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let properties = params.json("properties")?;

    let Value::Object(body) = properties else {
        return Err(Error::invalid_argument(
            "Subscriber properties must be a JSON object",
        ));
    };

    let response = client
        .patch(&format!("/subscribers/{subscriber_id}/properties"), body)
        .await?;
    Ok(simplify(response))
}
