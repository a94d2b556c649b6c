//! Per-item batch execution
//!
//! The host hands over a batch of items sharing one (resource, action) pair,
//! each with its own parameter bag. Items run strictly in order, one awaited
//! operation at a time; there is no fan-out. Array results are flattened into
//! individual output records, matching how hosts feed records downstream.

use crate::error::Result;
use crate::http::PostscriptClient;
use crate::operations::{self, Action, Resource};
use crate::params::JsonObject;
use serde_json::{json, Value};
use tracing::warn;

/// Sequential batch executor
pub struct BatchExecutor<'a> {
    client: &'a PostscriptClient,
    continue_on_fail: bool,
}

impl<'a> BatchExecutor<'a> {
    /// Create an executor that aborts the batch on the first failure
    pub fn new(client: &'a PostscriptClient) -> Self {
        Self {
            client,
            continue_on_fail: false,
        }
    }

    /// Capture per-item errors and keep going instead of aborting
    #[must_use]
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    /// Run one operation per item, in input order.
    ///
    /// With continue-on-fail, a failed item contributes
    /// `{"error": "<message>"}` to the output and the next item proceeds;
    /// otherwise the first error aborts the whole batch.
    pub async fn run(
        &self,
        resource: Resource,
        action: Action,
        items: &[JsonObject],
    ) -> Result<Vec<Value>> {
        let mut output = Vec::new();

        for (index, params) in items.iter().enumerate() {
            match operations::execute(self.client, resource, action, params).await {
                Ok(Value::Array(records)) => output.extend(records),
                Ok(record) => output.push(record),
                Err(err) if self.continue_on_fail => {
                    warn!(index, %resource, %action, error = %err, "item failed, continuing");
                    output.push(json!({"error": err.to_string()}));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::http::ClientConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> PostscriptClient {
        let config = ClientConfig::builder()
            .base_url(base_url)
            .page_delay(Duration::ZERO)
            .build();
        PostscriptClient::with_config(Credentials::new("test_key"), config)
    }

    fn item(value: serde_json::Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_items_processed_in_order() {
        let server = MockServer::start().await;
        for id in ["sub_1", "sub_2"] {
            Mock::given(method("GET"))
                .and(path(format!("/subscribers/{id}")))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"data": {"id": id}})),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server.uri());
        let output = BatchExecutor::new(&client)
            .run(
                Resource::Subscriber,
                Action::Get,
                &[
                    item(json!({"subscriberId": "sub_1"})),
                    item(json!({"subscriberId": "sub_2"})),
                ],
            )
            .await
            .unwrap();

        assert_eq!(output, vec![json!({"id": "sub_1"}), json!({"id": "sub_2"})]);
    }

    #[tokio::test]
    async fn test_array_results_are_flattened() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/segments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "seg_1"}, {"id": "seg_2"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let output = BatchExecutor::new(&client)
            .run(Resource::Segment, Action::GetAll, &[item(json!({}))])
            .await
            .unwrap();

        assert_eq!(output.len(), 2);
    }

    #[tokio::test]
    async fn test_first_error_aborts_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscribers/bad"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "not_found", "message": "no such subscriber"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = BatchExecutor::new(&client)
            .run(
                Resource::Subscriber,
                Action::Get,
                &[
                    item(json!({"subscriberId": "bad"})),
                    item(json!({"subscriberId": "sub_2"})),
                ],
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_continue_on_fail_captures_error_and_proceeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscribers/bad"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "not_found", "message": "no such subscriber"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscribers/sub_2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "sub_2"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let output = BatchExecutor::new(&client)
            .continue_on_fail(true)
            .run(
                Resource::Subscriber,
                Action::Get,
                &[
                    item(json!({"subscriberId": "bad"})),
                    item(json!({"subscriberId": "sub_2"})),
                ],
            )
            .await
            .unwrap();

        assert_eq!(output.len(), 2);
        let error_text = output[0]["error"].as_str().unwrap();
        assert!(error_text.contains("no such subscriber"));
        assert_eq!(output[1], json!({"id": "sub_2"}));
    }

    #[tokio::test]
    async fn test_invalid_argument_is_captured_per_item_too() {
        let client = client_for("http://127.0.0.1:1");
        let output = BatchExecutor::new(&client)
            .continue_on_fail(true)
            .run(
                Resource::Message,
                Action::Send,
                &[item(json!({
                    "subscriberId": "sub_1",
                    "body": "a".repeat(161),
                }))],
            )
            .await
            .unwrap();

        assert!(output[0]["error"]
            .as_str()
            .unwrap()
            .contains("maximum length of 160"));
    }
}
