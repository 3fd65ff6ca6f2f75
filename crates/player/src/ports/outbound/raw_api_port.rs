//! Raw API Port - Object-safe HTTP boundary
//!
//! Typed request/response handling is generic and therefore not object-safe.
//! `RawApiPort` is the JSON-in/JSON-out boundary implemented by adapters and
//! stored behind `Arc<dyn RawApiPort>`; the application layer provides the
//! typed `Api` wrapper on top.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure talking to the backend
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body could not be decoded into the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The HTTP client could not be built from its configuration
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RawApiPort: Send + Sync {
    /// `GET {base}{path}` where `path` may carry a query string
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// `POST` without a request body
    async fn post_empty(&self, path: &str) -> Result<Value, ApiError>;
}
