//! # Postscript Connector
//!
//! A Rust connector for the Postscript SMS marketing platform, built for
//! embedding in workflow-automation hosts. It translates logical operations
//! (resource + action + parameters) into authenticated calls against the
//! Postscript REST API, aggregates paginated results, classifies failures
//! into a small stable taxonomy, and turns inbound webhook deliveries into
//! host-native event payloads.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use postscript_connector::{
//!     dispatch, Action, Credentials, OperationDescriptor, PostscriptClient, Resource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> postscript_connector::Result<()> {
//!     let client = PostscriptClient::new(Credentials::new("sk_live_..."));
//!
//!     // Validate the key before doing anything else.
//!     client.verify_credentials().await?;
//!
//!     let descriptor = OperationDescriptor::new(
//!         Resource::Subscriber,
//!         Action::GetAll,
//!         serde_json::json!({"returnAll": true})
//!             .as_object()
//!             .cloned()
//!             .unwrap(),
//!     );
//!     let subscribers = dispatch(&client, &descriptor).await?;
//!     println!("{subscribers}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Operation Dispatch                      │
//! │   (resource, action, params) → request → shaped result      │
//! └─────────────────────────────────────────────────────────────┘
//!               │                                  │
//! ┌─────────────┴───────────┐        ┌─────────────┴────────────┐
//! │      Normalizers        │        │      HTTP Executor       │
//! │  phone / date / payload │        │  auth, classify, paginate│
//! └─────────────────────────┘        └──────────────────────────┘
//!               │                                  │
//! ┌─────────────┴───────────┐        ┌─────────────┴────────────┐
//! │     Batch Executor      │        │     Webhook Trigger      │
//! │  in-order, per-item err │        │  lifecycle + receiver    │
//! └─────────────────────────┘        └──────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// API credentials
pub mod credentials;

/// Host-supplied operation parameters
pub mod params;

/// Input normalizers (phone, date, query, message payload)
pub mod normalize;

/// HTTP request executor and paginator
pub mod http;

/// Operation dispatch across the nine API resources
pub mod operations;

/// Sequential per-item batch execution
pub mod batch;

/// Webhook trigger: topics, lifecycle, receiver
pub mod trigger;

// ============================================================================
// Re-exports
// ============================================================================

pub use batch::BatchExecutor;
pub use credentials::{Credentials, Environment};
pub use error::{Error, OperationError, Result};
pub use http::{ClientConfig, PostscriptClient, API_BASE_URL, PARTNER_API_BASE_URL};
pub use operations::{dispatch, simplify, Action, OperationDescriptor, Resource};
pub use params::{JsonObject, ParamSource, Query};
pub use trigger::{WebhookRegistration, WebhookStore, WebhookTopic};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
