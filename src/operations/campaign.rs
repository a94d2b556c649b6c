//! Campaign operations

use super::{list, simplify, unsupported, Action, Resource};
use crate::error::Result;
use crate::http::PostscriptClient;
use crate::normalize::format_date;
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
        Action::GetStats => get_stats(client, params).await,
        Action::Schedule => schedule(client, params).await,
        other => Err(unsupported(Resource::Campaign, other)),
    }
}

async fn get_all(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let filters = params.object_or_default("filters");
    let mut query = Query::new();

    if let Some(status) = filters.string_opt("status") {
        query.insert("status".to_string(), status);
    }
    if let Some(after) = filters.string_opt("created_after") {
        query.insert("created_after".to_string(), format_date(&after)?);
    }
    if let Some(before) = filters.string_opt("created_before") {
        query.insert("created_before".to_string(), format_date(&before)?);
    }

    list(client, "/campaigns", params, query).await
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let campaign_id = params.string("campaignId")?;
    let response = client.get(&format!("/campaigns/{campaign_id}")).await?;
    Ok(simplify(response))
}

async fn get_stats(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let campaign_id = params.string("campaignId")?;
    let include_details = params.bool_or("includeDetails", false);

    let mut query = Query::new();
    query.insert("include_details".to_string(), include_details.to_string());

    let response = client
        .get_query(&format!("/campaigns/{campaign_id}/stats"), query)
        .await?;
    Ok(simplify(response))
}

async fn schedule(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let campaign_id = params.string("campaignId")?;
    let send_at = format_date(&params.string("sendAt")?)?;

    let mut body = JsonObject::new();
    body.insert("send_at".to_string(), Value::String(send_at));
    body.extend(params.object_or_default("options"));

    let response = client
        .post(&format!("/campaigns/{campaign_id}/schedule"), body)
        .await?;
    Ok(simplify(response))
}
