//! Postscript API credentials
//!
//! Credentials are supplied by the host per configured connection and are
//! read-only from the connector's point of view. They are never persisted
//! here.

use serde::{Deserialize, Serialize};

/// Postscript environment a connection targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

/// API credentials for a configured Postscript connection
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API key from the Postscript dashboard (Shop Settings -> API)
    pub api_key: String,

    /// Target environment
    #[serde(default)]
    pub environment: Environment,
}

impl Credentials {
    /// Create production credentials from an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: Environment::Production,
        }
    }

    /// Create credentials for a specific environment
    pub fn with_environment(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
        }
    }

    /// Bearer token header value for outbound requests
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

// The API key is a secret; keep it out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("environment", &self.environment)
            .finish()
    }
}
