//! Tests for operation dispatch

use super::*;
use crate::credentials::Credentials;
use crate::http::ClientConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str) -> PostscriptClient {
    let config = ClientConfig::builder()
        .base_url(base_url)
        .page_delay(Duration::ZERO)
        .build();
    PostscriptClient::with_config(Credentials::new("test_key"), config)
}

/// Client pointing at a closed port; any network attempt fails loudly
fn offline_client() -> PostscriptClient {
    client_for("http://127.0.0.1:1")
}

async fn run(
    base_url: &str,
    resource: Resource,
    action: Action,
    params: serde_json::Value,
) -> crate::error::Result<Value> {
    let descriptor = OperationDescriptor::new(
        resource,
        action,
        params.as_object().cloned().unwrap_or_default(),
    );
    dispatch(&client_for(base_url), &descriptor).await
}

#[test]
fn test_simplify_unwraps_data() {
    let simplified = simplify(json!({"data": {"id": "sub_1"}}));
    assert_eq!(simplified, json!({"id": "sub_1"}));
}

#[test]
fn test_simplify_passes_through_without_data() {
    let body = json!({"id": "sub_1", "meta": {}});
    assert_eq!(simplify(body.clone()), body);

    let array = json!([1, 2, 3]);
    assert_eq!(simplify(array.clone()), array);
}

#[test]
fn test_resource_and_action_wire_names() {
    assert_eq!(Resource::Subscriber.to_string(), "subscriber");
    assert_eq!(Action::GetAll.to_string(), "getAll");
    assert_eq!(Action::SendMms.to_string(), "sendMMS");
    let action: Action = serde_json::from_str("\"sendMMS\"").unwrap();
    assert_eq!(action, Action::SendMms);
    let action: Action = serde_json::from_str("\"getByPhone\"").unwrap();
    assert_eq!(action, Action::GetByPhone);
}

#[tokio::test]
async fn test_unsupported_pair_fails_before_any_network_call() {
    let err = dispatch(
        &offline_client(),
        &OperationDescriptor::new(Resource::Shop, Action::Delete, Default::default()),
    )
    .await
    .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("delete"));
    assert!(err.to_string().contains("shop"));
}

#[tokio::test]
async fn test_subscriber_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscribers/sub_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "sub_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Subscriber,
        Action::Get,
        json!({"subscriberId": "sub_1"}),
    )
    .await
    .unwrap();
    assert_eq!(result, json!({"id": "sub_1"}));
}

#[tokio::test]
async fn test_subscriber_get_missing_id_fails_fast() {
    let err = dispatch(
        &offline_client(),
        &OperationDescriptor::new(Resource::Subscriber, Action::Get, Default::default()),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::MissingParameter { .. }
    ));
}

#[tokio::test]
async fn test_subscriber_get_by_phone_normalizes_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscribers/search"))
        .and(query_param("phone_number", "+15551234567"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "sub_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Subscriber,
        Action::GetByPhone,
        json!({"phoneNumber": "(555) 123-4567"}),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_subscriber_create_builds_wire_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscribers"))
        .and(body_json(json!({
            "phone_number": "+15551234567",
            "keyword_id": "kw_1",
            "email": "a@example.com",
            "tags": ["vip", "beta"],
            "properties": {"plan": "gold"},
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "sub_9"}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Subscriber,
        Action::Create,
        json!({
            "phoneNumber": "555-123-4567",
            "keywordId": "kw_1",
            "additionalFields": {
                "email": "a@example.com",
                "tags": "vip, beta",
                "properties": "{\"plan\": \"gold\"}",
            },
        }),
    )
    .await
    .unwrap();
    assert_eq!(result, json!({"id": "sub_9"}));
}

#[tokio::test]
async fn test_subscriber_update_normalizes_phone() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/subscribers/sub_1"))
        .and(body_json(json!({"phone_number": "+15551234567"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "sub_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Subscriber,
        Action::Update,
        json!({
            "subscriberId": "sub_1",
            "updateFields": {"phone_number": "5551234567"},
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_subscriber_remove_tag_encodes_path_and_synthesizes_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/subscribers/sub_1/tags/vip%20customer"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Subscriber,
        Action::RemoveTag,
        json!({"subscriberId": "sub_1", "tagName": "vip customer"}),
    )
    .await
    .unwrap();
    assert_eq!(result, json!({"success": true}));
}

#[tokio::test]
async fn test_message_send_checks_length_before_network() {
    let err = run(
        "http://127.0.0.1:1",
        Resource::Message,
        Action::Send,
        json!({"subscriberId": "sub_1", "body": "a".repeat(161)}),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::MessageTooLong {
            limit: 160,
            length: 161
        }
    ));
}

#[tokio::test]
async fn test_message_send_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_json(json!({
            "subscriber_id": "sub_1",
            "body": "Hello!",
            "use_short_links": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "msg_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Message,
        Action::Send,
        json!({
            "subscriberId": "sub_1",
            "body": "Hello!",
            "options": {"useShortLinks": false},
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_message_send_mms_attaches_media_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_json(json!({
            "subscriber_id": "sub_1",
            "body": "Look at this",
            "media_url": "https://example.com/image.jpg",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "msg_2"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Message,
        Action::SendMms,
        json!({
            "subscriberId": "sub_1",
            "body": "Look at this",
            "mediaUrl": "https://example.com/image.jpg",
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_get_all_single_page_applies_default_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/keywords"))
        .and(query_param("limit", "50"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "kw_1"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = run(&server.uri(), Resource::Keyword, Action::GetAll, json!({}))
        .await
        .unwrap();
    assert_eq!(result, json!([{"id": "kw_1"}]));
}

#[tokio::test]
async fn test_get_all_return_all_paginates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c_1"}],
            "meta": {"page": 1, "limit": 1, "total": 2},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "c_2"}],
            "meta": {"page": 2, "limit": 1, "total": 2},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Campaign,
        Action::GetAll,
        json!({"returnAll": true}),
    )
    .await
    .unwrap();
    assert_eq!(result, json!([{"id": "c_1"}, {"id": "c_2"}]));
}

#[tokio::test]
async fn test_keyword_delete_returns_synthetic_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/keywords/kw_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Keyword,
        Action::Delete,
        json!({"keywordId": "kw_1"}),
    )
    .await
    .unwrap();
    assert_eq!(result, json!({"success": true}));
}

#[tokio::test]
async fn test_campaign_schedule_formats_send_at() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/campaigns/c_1/schedule"))
        .and(body_json(json!({"send_at": "2024-06-01T09:00:00.000Z"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "c_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Campaign,
        Action::Schedule,
        json!({"campaignId": "c_1", "sendAt": "2024-06-01T09:00:00Z"}),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_automation_enable_and_disable_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/automations/a_1/enable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "a_1"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/automations/a_1/disable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "a_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Automation,
        Action::Enable,
        json!({"automationId": "a_1"}),
    )
    .await
    .unwrap();
    run(
        &server.uri(),
        Resource::Automation,
        Action::Disable,
        json!({"automationId": "a_1"}),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_automation_trigger_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/automations/a_1/trigger"))
        .and(body_json(json!({
            "subscriber_id": "sub_1",
            "properties": {"source": "api"},
            "skip_delay": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"queued": true}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Automation,
        Action::Trigger,
        json!({
            "automationId": "a_1",
            "subscriberId": "sub_1",
            "options": {
                "properties": "{\"source\": \"api\"}",
                "skipDelay": true,
            },
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_event_track_with_phone_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(body_json(json!({
            "event_type": "signed_up",
            "properties": {"source": "landing"},
            "phone_number": "+15551234567",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Event,
        Action::Track,
        json!({
            "identifierType": "phone_number",
            "phoneNumber": "5551234567",
            "eventType": "signed_up",
            "properties": "{\"source\": \"landing\"}",
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_event_track_ecommerce_order_properties() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(body_json(json!({
            "event_type": "order_completed",
            "subscriber_id": "sub_1",
            "properties": {
                "order_id": "ord_1",
                "order_total": 49.99,
                "currency": "USD",
                "coupon": "SPRING",
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Event,
        Action::TrackEcommerce,
        json!({
            "identifierType": "subscriber_id",
            "subscriberId": "sub_1",
            "ecommerceEventType": "order_completed",
            "orderId": "ord_1",
            "orderTotal": 49.99,
            "additionalProperties": "{\"coupon\": \"SPRING\"}",
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_shop_get_stats_custom_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop/stats"))
        .and(query_param("range", "custom"))
        .and(query_param("include_breakdown", "true"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    run(
        &server.uri(),
        Resource::Shop,
        Action::GetStats,
        json!({
            "dateRange": "custom",
            "includeBreakdown": true,
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_webhook_create_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_json(json!({
            "url": "https://host.example/webhook",
            "topic": "message.sent",
            "format": "json",
            "active": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "wh_1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = run(
        &server.uri(),
        Resource::Webhook,
        Action::Create,
        json!({
            "url": "https://host.example/webhook",
            "topic": "message.sent",
            "options": {"active": true},
        }),
    )
    .await
    .unwrap();
    assert_eq!(result, json!({"id": "wh_1"}));
}

#[tokio::test]
async fn test_api_error_propagates_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/segments/seg_1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "not_found", "message": "segment does not exist"}
        })))
        .mount(&server)
        .await;

    let err = run(
        &server.uri(),
        Resource::Segment,
        Action::Get,
        json!({"segmentId": "seg_1"}),
    )
    .await
    .unwrap_err();

    match err {
        crate::error::Error::Api { code, status, .. } => {
            assert_eq!(code, "not_found");
            assert_eq!(status, 404);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
