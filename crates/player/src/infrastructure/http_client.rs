//! reqwest adapter for `RawApiPort`
//!
//! Builds `base_url + path`, sends JSON, and maps every failure onto
//! `ApiError`. No retries happen at this layer; callers that want them use a
//! `PollPolicy`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::ports::outbound::{ApiError, RawApiPort};

/// HTTP client for the game backend
#[derive(Clone)]
pub struct ReqwestApiAdapter {
    client: Client,
    base_url: String,
}

impl ReqwestApiAdapter {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: &'static str, path: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        tracing::debug!(method, path, "Backend request");

        let response = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(method, path, status = status.as_u16(), "Backend returned error status");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RawApiPort for ReqwestApiAdapter {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.get(self.url(path));
        self.send("GET", path, request).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.send("POST", path, request).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.post(self.url(path));
        self.send("POST", path, request).await
    }
}
