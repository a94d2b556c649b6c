//! HTTP layer
//!
//! The request executor builds one authenticated request per call, executes
//! it, and classifies the outcome; the paginator loops the executor to
//! aggregate every page of a list endpoint.

mod client;
mod paginate;

pub use client::{
    ClientConfig, ClientConfigBuilder, PostscriptClient, RateLimiterConfig, API_BASE_URL,
    PARTNER_API_BASE_URL,
};
pub use paginate::{PageMeta, PAGE_LIMIT};
