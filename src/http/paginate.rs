//! Page-loop paginator
//!
//! Aggregates every page of a list endpoint into one ordered collection by
//! repeatedly invoking the request executor with `page`/`limit` query
//! parameters and inspecting the response `meta` envelope.

use super::client::PostscriptClient;
use crate::error::Result;
use crate::params::{JsonObject, Query};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Fixed page size requested from list endpoints
pub const PAGE_LIMIT: u64 = 100;

/// Pagination metadata reported by list responses
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl PageMeta {
    /// Whether another page exists.
    ///
    /// Uses the service's reported page/limit exactly as the API documents
    /// its own pagination contract; a short non-final page would be
    /// mis-counted, so this formula must not be "fixed" locally.
    pub fn has_more(self) -> bool {
        self.page * self.limit < self.total
    }
}

impl PostscriptClient {
    /// Fetch all pages of a list endpoint and return the concatenated items.
    ///
    /// Items come from `response[data_key]`, falling back to the whole body
    /// when that key is absent; non-array pages contribute nothing. A
    /// response without `meta` means single page. Order is response order,
    /// page by page, never deduplicated. Any request failure aborts the loop
    /// and discards what was accumulated. Between pages the client sleeps
    /// for its configured page delay.
    pub async fn fetch_all(
        &self,
        method: Method,
        endpoint: &str,
        body: JsonObject,
        query: Query,
        data_key: &str,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page: u64 = 1;

        loop {
            let mut page_query = query.clone();
            page_query.insert("page".to_string(), page.to_string());
            page_query.insert("limit".to_string(), PAGE_LIMIT.to_string());

            let response = self
                .request(method.clone(), endpoint, body.clone(), page_query)
                .await?;

            let page_items = response.get(data_key).unwrap_or(&response);
            if let Value::Array(chunk) = page_items {
                items.extend(chunk.iter().cloned());
            }

            let meta: Option<PageMeta> = response
                .get("meta")
                .and_then(|m| serde_json::from_value(m.clone()).ok());

            match meta {
                Some(meta) if meta.has_more() => {
                    debug!(page, total = meta.total, "fetching next page");
                    page += 1;
                    if !self.config.page_delay.is_zero() {
                        tokio::time::sleep(self.config.page_delay).await;
                    }
                }
                _ => break,
            }
        }

        Ok(items)
    }
}
