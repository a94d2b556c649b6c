//! Request executor
//!
//! Builds one authenticated HTTP request per invocation from
//! (method, endpoint-or-url, body, query), executes it, and classifies the
//! outcome. A non-2xx answer becomes [`Error::Api`] with the best-effort
//! message/code/status from the response body; a failure with no
//! interpretable response becomes [`Error::Operation`]. Nothing is retried.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::params::{JsonObject, Query};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Primary API base
pub const API_BASE_URL: &str = "https://api.postscript.io/api/v2";

/// Partner API base, same auth as the primary
pub const PARTNER_API_BASE_URL: &str = "https://api.postscript.io/partners/api";

/// Configuration for a self-imposed request rate cap
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket gate applied before every outbound request
struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    fn new(config: RateLimiterConfig) -> Self {
        let one = NonZeroU32::MIN;
        let quota = Quota::per_second(NonZeroU32::new(config.requests_per_second).unwrap_or(one))
            .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(one));
        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

/// Configuration for the Postscript client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Primary API base URL
    pub base_url: String,
    /// Partner API base URL
    pub partner_base_url: String,
    /// Request timeout, enforced by the HTTP client
    pub timeout: Duration,
    /// Delay between pages while paginating
    pub page_delay: Duration,
    /// Optional request rate cap
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            partner_base_url: PARTNER_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(100),
            rate_limit: None,
            user_agent: format!("postscript-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the primary API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the partner API base URL
    pub fn partner_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.partner_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the delay between pagination requests
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.config.page_delay = delay;
        self
    }

    /// Cap the outbound request rate
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Authenticated client for the Postscript API
pub struct PostscriptClient {
    http: reqwest::Client,
    pub(crate) config: ClientConfig,
    credentials: Credentials,
    rate_limiter: Option<RateLimiter>,
}

impl PostscriptClient {
    /// Create a client with the default configuration
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        let rate_limiter = config.rate_limit.map(RateLimiter::new);

        Self {
            http,
            config,
            credentials,
            rate_limiter,
        }
    }

    /// Execute one request against the primary API.
    ///
    /// `endpoint` is a path appended to the configured base, or a full URL
    /// used verbatim. Body and query are attached only when non-empty; some
    /// endpoints reject an empty JSON object where an absent body is fine.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: JsonObject,
        query: Query,
    ) -> Result<Value> {
        let url = self.resolve_url(endpoint, &self.config.base_url)?;
        self.execute(method, url, body, query).await
    }

    /// Execute one request against the partner API
    pub async fn partner_request(
        &self,
        method: Method,
        endpoint: &str,
        body: JsonObject,
        query: Query,
    ) -> Result<Value> {
        let url = self.resolve_url(endpoint, &self.config.partner_base_url)?;
        self.execute(method, url, body, query).await
    }

    /// GET without body or query
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::GET, endpoint, JsonObject::new(), Query::new())
            .await
    }

    /// GET with query parameters
    pub async fn get_query(&self, endpoint: &str, query: Query) -> Result<Value> {
        self.request(Method::GET, endpoint, JsonObject::new(), query)
            .await
    }

    /// POST with a JSON body
    pub async fn post(&self, endpoint: &str, body: JsonObject) -> Result<Value> {
        self.request(Method::POST, endpoint, body, Query::new())
            .await
    }

    /// PATCH with a JSON body
    pub async fn patch(&self, endpoint: &str, body: JsonObject) -> Result<Value> {
        self.request(Method::PATCH, endpoint, body, Query::new())
            .await
    }

    /// DELETE without body or query
    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::DELETE, endpoint, JsonObject::new(), Query::new())
            .await
    }

    /// Probe the configured API key with `GET /shop`; any 2xx passes
    pub async fn verify_credentials(&self) -> Result<Value> {
        self.get("/shop").await
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: JsonObject,
        query: Query,
    ) -> Result<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        debug!(%method, %url, "executing Postscript API request");

        let mut req = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.credentials.bearer())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !body.is_empty() {
            req = req.json(&body);
        }
        if !query.is_empty() {
            req = req.query(&query);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        Err(classify_api_error(status, &text))
    }

    fn resolve_url(&self, endpoint: &str, base: &str) -> Result<Url> {
        let full = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            )
        };
        Url::parse(&full).map_err(|e| Error::invalid_argument(format!("Invalid URL {full}: {e}")))
    }
}

impl std::fmt::Debug for PostscriptClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostscriptClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Map a non-2xx answer to [`Error::Api`].
///
/// Message resolution order: `body.error.message`, then `body.message`, then
/// the raw response text, then the canonical status reason. The code falls
/// back to the numeric status.
fn classify_api_error(status: StatusCode, text: &str) -> Error {
    let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);

    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    let code = body
        .pointer("/error/code")
        .and_then(Value::as_str)
        .map_or_else(|| status.as_u16().to_string(), str::to_string);

    Error::api(code, message, status.as_u16())
}
