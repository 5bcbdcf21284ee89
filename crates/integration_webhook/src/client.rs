//! Webhook client

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Webhook client errors
///
/// Error messages never include the webhook URL, which carries the token.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("Webhook request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Client initialization failed: {0}")]
    Initialization(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(e.without_url().to_string())
        }
    }
}

/// Webhook client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookClientConfig {
    /// Request timeout in seconds (default: 5)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_timeout() -> u64 {
    5
}

impl Default for WebhookClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

/// Body of a webhook POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage<'a> {
    pub content: &'a str,
}

/// HTTP client for chat webhooks
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    config: WebhookClientConfig,
}

impl WebhookClient {
    /// Create a new webhook client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WebhookClientConfig) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WebhookError::Initialization(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    #[must_use]
    pub const fn config(&self) -> &WebhookClientConfig {
        &self.config
    }

    /// Parse and check a webhook URL
    pub fn parse_url(url: &str) -> Result<Url, WebhookError> {
        let parsed = Url::parse(url).map_err(|e| WebhookError::InvalidUrl(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(WebhookError::InvalidUrl(format!(
                "unsupported scheme '{other}'"
            ))),
        }
    }

    /// POST `{"content": ...}` and return the response status
    ///
    /// Any response is returned as `Ok`, whatever its status. The caller
    /// decides what counts as delivered.
    #[instrument(skip(self, url, content), fields(content_len = content.len()))]
    pub async fn post_content(&self, url: &str, content: &str) -> Result<StatusCode, WebhookError> {
        let url = Self::parse_url(url)?;

        let response = self
            .client
            .post(url)
            .json(&WebhookMessage { content })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "Webhook response");
        }

        Ok(status)
    }
}
