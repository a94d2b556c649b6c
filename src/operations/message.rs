//! Message operations
//!
//! Send paths run the length check before any network I/O: 160 characters
//! for plain SMS, 1600 for multimedia.

use super::{list, simplify, unsupported, Action, Resource};
use crate::error::Result;
use crate::http::PostscriptClient;
use crate::normalize::{
    build_message_payload, check_message_length, format_date, MessageOptions,
};
use crate::params::{ParamSource, Query};
use serde_json::Value;

pub(super) async fn execute(
    client: &PostscriptClient,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match action {
        Action::GetAll => get_all(client, params).await,
        Action::Get => get(client, params).await,
        Action::Send => send(client, params).await,
        Action::SendMms => send_mms(client, params).await,
        Action::GetStats => get_stats(client, params).await,
        other => Err(unsupported(Resource::Message, other)),
    }
}

async fn get_all(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let filters = params.object_or_default("filters");
    let mut query = Query::new();

    if let Some(subscriber_id) = filters.string_opt("subscriber_id") {
        query.insert("subscriber_id".to_string(), subscriber_id);
    }
    if let Some(status) = filters.string_opt("status") {
        query.insert("status".to_string(), status);
    }
    if let Some(after) = filters.string_opt("sent_after") {
        query.insert("sent_after".to_string(), format_date(&after)?);
    }
    if let Some(before) = filters.string_opt("sent_before") {
        query.insert("sent_before".to_string(), format_date(&before)?);
    }

    list(client, "/messages", params, query).await
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let message_id = params.string("messageId")?;
    let response = client.get(&format!("/messages/{message_id}")).await?;
    Ok(simplify(response))
}

async fn send(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let text = params.string("body")?;
    let options = MessageOptions::from_params(&params.object_or_default("options"));

    check_message_length(&text, false)?;
    let payload = build_message_payload(&subscriber_id, &text, &options);

    let response = client.post("/messages", payload).await?;
    Ok(simplify(response))
}

async fn send_mms(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let subscriber_id = params.string("subscriberId")?;
    let text = params.string("body")?;
    let media_url = params.string("mediaUrl")?;
    let options =
        MessageOptions::from_params(&params.object_or_default("options")).with_media_url(media_url);

    check_message_length(&text, true)?;
    let payload = build_message_payload(&subscriber_id, &text, &options);

    let response = client.post("/messages", payload).await?;
    Ok(simplify(response))
}

async fn get_stats(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let date_range = params.string("dateRange")?;
    let mut query = Query::new();
    query.insert("range".to_string(), date_range.clone());

    if date_range == "custom" {
        query.insert("start_date".to_string(), params.string("startDate")?);
        query.insert("end_date".to_string(), params.string("endDate")?);
    }

    let response = client.get_query("/messages/stats", query).await?;
    Ok(simplify(response))
}
