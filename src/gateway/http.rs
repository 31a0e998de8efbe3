//! HTTP implementation of [`ShapeBackend`] over `reqwest`.
//!
//! Thin wrapper around the three backend endpoints. Status mapping and body
//! parsing live in pure functions for testability.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{Task, UserStats, ValidateRequest, ValidateResponse};
use super::{GatewayError, ShapeBackend};
use crate::config::GatewaySettings;

const TASK_PATH: &str = "/api/get_task";
const STATS_PATH: &str = "/api/user_stats";
const VALIDATE_PATH: &str = "/api/validate_shape";

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for the backend described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(settings.timeouts.connect_secs))
            .build()
            .map_err(|e| GatewayError::HttpClientBuild(e.to_string()))?;
        let base_url = settings.base_url.trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        debug!(path, status, bytes = text.len(), "gateway: response");
        parse_response(status, &text)
    }
}

#[async_trait::async_trait]
impl ShapeBackend for HttpBackend {
    async fn fetch_task(&self) -> Result<Task, GatewayError> {
        let response = self
            .http
            .get(self.url(TASK_PATH))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::read(TASK_PATH, response).await
    }

    async fn fetch_user_stats(&self) -> Result<UserStats, GatewayError> {
        let response = self
            .http
            .get(self.url(STATS_PATH))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::read(STATS_PATH, response).await
    }

    async fn validate(&self, request: &ValidateRequest) -> Result<ValidateResponse, GatewayError> {
        let response = self
            .http
            .post(self.url(VALIDATE_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::read(VALIDATE_PATH, response).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Map an HTTP status and body to a typed result.
pub(crate) fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, GatewayError> {
    match status {
        401 => Err(GatewayError::Unauthorized),
        200..=299 => serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string())),
        _ => {
            warn!(status, "gateway: backend error status");
            Err(GatewayError::Status { status, body: body.to_owned() })
        }
    }
}
