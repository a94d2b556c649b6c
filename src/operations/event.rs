//! Event operations
//!
//! Events identify a subscriber either by id or by phone number; phone
//! numbers are normalized to E.164 before the call goes out. The e-commerce
//! track path assembles order/product/cart properties keyed off the event
//! type, the way the Postscript event API expects them.

use super::{simplify, unsupported, Action, Resource};
use crate::error::{Error, Result};
use crate::http::PostscriptClient;
use crate::normalize::{format_date, normalize_phone_number};
use crate::params::{JsonObject, ParamSource};
use serde_json::{Number, Value};

pub(super) async fn execute(
    client: &PostscriptClient,
    action: Action,
    params: &dyn ParamSource,
) -> Result<Value> {
    match action {
        Action::Track => track(client, params).await,
        Action::TrackEcommerce => track_ecommerce(client, params).await,
        Action::GetTypes => get_types(client).await,
        other => Err(unsupported(Resource::Event, other)),
    }
}

/// Insert `subscriber_id` or a normalized `phone_number` per the configured
/// identifier type
fn insert_identifier(body: &mut JsonObject, params: &dyn ParamSource) -> Result<()> {
    let identifier_type = params
        .string_opt("identifierType")
        .unwrap_or_else(|| "subscriber_id".to_string());

    if identifier_type == "subscriber_id" {
        let subscriber_id = params.string("subscriberId")?;
        body.insert("subscriber_id".to_string(), Value::String(subscriber_id));
    } else {
        let phone = normalize_phone_number(&params.string("phoneNumber")?)?;
        body.insert("phone_number".to_string(), Value::String(phone));
    }
    Ok(())
}

async fn track(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let event_type = params.string("eventType")?;
    let properties = params.json("properties")?;
    let options = params.object_or_default("options");

    let mut body = JsonObject::new();
    body.insert("event_type".to_string(), Value::String(event_type));
    body.insert("properties".to_string(), properties);
    insert_identifier(&mut body, params)?;

    if let Some(occurred_at) = options.string_opt("occurred_at") {
        body.insert(
            "occurred_at".to_string(),
            Value::String(format_date(&occurred_at)?),
        );
    }

    let response = client.post("/events", body).await?;
    Ok(simplify(response))
}

fn insert_string(properties: &mut JsonObject, key: &str, value: Option<String>) {
    if let Some(value) = value {
        properties.insert(key.to_string(), Value::String(value));
    }
}

fn insert_number(properties: &mut JsonObject, key: &str, value: Option<f64>) {
    // Zero means "not provided" for money amounts coming from the host form.
    if let Some(value) = value.filter(|v| *v != 0.0) {
        if let Some(number) = Number::from_f64(value) {
            properties.insert(key.to_string(), Value::Number(number));
        }
    }
}

async fn track_ecommerce(client: &PostscriptClient, params: &dyn ParamSource) -> Result<Value> {
    let event_type = params.string("ecommerceEventType")?;

    let mut body = JsonObject::new();
    body.insert("event_type".to_string(), Value::String(event_type.clone()));
    insert_identifier(&mut body, params)?;

    let mut properties = JsonObject::new();

    if event_type == "order_completed" {
        insert_string(&mut properties, "order_id", params.string_opt("orderId"));
        insert_number(&mut properties, "order_total", params.number_opt("orderTotal"));
        insert_string(
            &mut properties,
            "currency",
            params.string_opt("currency").or_else(|| Some("USD".to_string())),
        );
    }

    if matches!(
        event_type.as_str(),
        "product_viewed" | "added_to_cart" | "browse_abandonment"
    ) {
        insert_string(&mut properties, "product_id", params.string_opt("productId"));
        insert_string(
            &mut properties,
            "product_name",
            params.string_opt("productName"),
        );
        insert_number(
            &mut properties,
            "product_price",
            params.number_opt("productPrice"),
        );
        insert_string(&mut properties, "product_url", params.string_opt("productUrl"));
        insert_string(
            &mut properties,
            "product_image_url",
            params.string_opt("productImageUrl"),
        );
    }

    if matches!(event_type.as_str(), "cart_abandonment" | "checkout_started") {
        insert_string(&mut properties, "cart_id", params.string_opt("cartId"));
        insert_number(&mut properties, "cart_total", params.number_opt("cartTotal"));
        insert_string(&mut properties, "cart_url", params.string_opt("cartUrl"));
    }

    if let Some(additional) = params.json_opt("additionalProperties")? {
        let Value::Object(additional) = additional else {
            return Err(Error::invalid_argument(
                "Additional event properties must be a JSON object",
            ));
        };
        properties.extend(additional);
    }

    body.insert("properties".to_string(), Value::Object(properties));

    let response = client.post("/events", body).await?;
    Ok(simplify(response))
}

async fn get_types(client: &PostscriptClient) -> Result<Value> {
    let response = client.get("/events/types").await?;
    Ok(simplify(response))
}
