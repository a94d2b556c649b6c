//! Shop operations

use super::{simplify, unsupported, Action, Resource};
use crate::error::Result;
use crate::http::PostscriptClient;
use crate::params::{ParamSource, Query};
use serde_json::Value;

pub(super) async fn execute(
    client: &PostscriptClient,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match action {
        Action::Get => get(client).await,
        Action::GetStats => get_stats(client, params).await,
        Action::GetComplianceSettings => get_compliance_settings(client).await,
        other => Err(unsupported(Resource::Shop, other)),
    }
}

async fn get(client: &PostscriptClient) -> Result<Value> {
    let response = client.get("/shop").await?;
    Ok(simplify(response))
}

async fn get_stats(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let date_range = params.string("dateRange")?;
    let include_breakdown = params.bool_or("includeBreakdown", false);

    let mut query = Query::new();
    query.insert("range".to_string(), date_range.clone());
    query.insert(
        "include_breakdown".to_string(),
        include_breakdown.to_string(),
    );

    if date_range == "custom" {
        query.insert("start_date".to_string(), params.string("startDate")?);
        query.insert("end_date".to_string(), params.string("endDate")?);
    }

    let response = client.get_query("/shop/stats", query).await?;
    Ok(simplify(response))
}

async fn get_compliance_settings(client: &PostscriptClient) -> Result<Value> {
    let response = client.get("/shop/compliance").await?;
    Ok(simplify(response))
}
