//! Automation operations

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
        Action::GetAll => get_all(client, params).await,
        Action::Get => get(client, params).await,
        Action::GetStats => get_stats(client, params).await,
        Action::Trigger => trigger(client, params).await,
        Action::Enable => set_enabled(client, params, true).await,
        Action::Disable => set_enabled(client, params, false).await,
        other => Err(unsupported(Resource::Automation, other)),
    }
}

async fn get_all(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let filters = params.object_or_default("filters");
    let mut query = Query::new();

    if let Some(status) = filters.string_opt("status") {
        query.insert("status".to_string(), status);
    }
    if let Some(trigger_type) = filters.string_opt("trigger_type") {
        query.insert("trigger_type".to_string(), trigger_type);
    }

    list(client, "/automations", params, query).await
}

async fn get(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let automation_id = params.string("automationId")?;
    let response = client.get(&format!("/automations/{automation_id}")).await?;
    Ok(simplify(response))
}

async fn get_stats(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let automation_id = params.string("automationId")?;
    let date_range = params.string("dateRange")?;

    let mut query = Query::new();
    query.insert("range".to_string(), date_range);

    let response = client
        .get_query(&format!("/automations/{automation_id}/stats"), query)
        .await?;
    Ok(simplify(response))
}

async fn trigger(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let automation_id = params.string("automationId")?;
    let subscriber_id = params.string("subscriberId")?;
    let options = params.object_or_default("options");

    let mut body = JsonObject::new();
    body.insert("subscriber_id".to_string(), Value::String(subscriber_id));

    if let Some(properties) = options.json_opt("properties")? {
        body.insert("properties".to_string(), properties);
    }
    if let Some(skip_delay) = options.bool_opt("skipDelay") {
        body.insert("skip_delay".to_string(), Value::Bool(skip_delay));
    }

    let response = client
        .post(&format!("/automations/{automation_id}/trigger"), body)
        .await?;
    Ok(simplify(response))
}

async fn set_enabled(
    client: &PostscriptClient,
    params: &dyn ParamSource,
    enabled: bool,
) -> Result<Value> {
    let automation_id = params.string("automationId")?;
    let verb = if enabled { "enable" } else { "disable" };
    let response = client
        .post(
            &format!("/automations/{automation_id}/{verb}"),
            JsonObject::new(),
        )
        .await?;
    Ok(simplify(response))
}
