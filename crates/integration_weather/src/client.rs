//! WeatherAPI.com client
//!
//! HTTP client for the `forecast.json` endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ApiErrorBody, DaySummary, ForecastResponse};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed or timed out
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service rejected the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API key was rejected (HTTP 401/403)
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Rate limit or monthly quota exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Service is temporarily unavailable (HTTP 5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Body is not the expected JSON document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Body parsed but contains no forecast day
    #[error("Missing data: {0}")]
    MissingData(String),
}

impl WeatherError {
    /// Whether the error describes the response body rather than the exchange
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::MissingData(_))
    }
}

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API base URL (default: <http://api.weatherapi.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Location query: city name, ZIP code or `lat,lon`
    #[serde(default)]
    pub location: String,

    /// Number of forecast days to request (1-14, default: 1)
    #[serde(default = "default_days")]
    pub days: u8,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_days() -> u8 {
    1
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            location: String::new(),
            days: default_days(),
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("location", &self.location)
            .field("days", &self.days)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Weather client trait for fetching forecasts
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch the forecast for the configured location
    async fn get_forecast(&self) -> Result<ForecastResponse, WeatherError>;

    /// Fetch the daily summary of the first forecast day
    async fn get_today(&self) -> Result<DaySummary, WeatherError> {
        let response = self.get_forecast().await?;
        response
            .first_day()
            .map(|day| day.day.clone())
            .ok_or_else(|| WeatherError::MissingData("forecast.forecastday is empty".to_string()))
    }

    /// Check if the weather service accepts our requests
    async fn is_healthy(&self) -> bool;
}

/// WeatherAPI.com HTTP client implementation
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Turn an error status into a `WeatherError`, keeping the provider's message
    fn status_error(status: StatusCode, body: &str) -> WeatherError {
        let detail = serde_json::from_str::<ApiErrorBody>(body).map_or_else(
            |_| format!("HTTP {status}"),
            |b| format!("HTTP {status}: {} (code {})", b.error.message, b.error.code),
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WeatherError::InvalidApiKey(detail),
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimitExceeded(detail),
            s if s.is_server_error() => WeatherError::ServiceUnavailable(detail),
            _ => WeatherError::RequestFailed(detail),
        }
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(location = %self.config.location, days = self.config.days))]
    async fn get_forecast(&self) -> Result<ForecastResponse, WeatherError> {
        let url = self.forecast_url();
        let days = self.config.days.clamp(1, 14).to_string();
        debug!(url = %url, "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", self.config.location.as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    WeatherError::ConnectionFailed(e.without_url().to_string())
                } else {
                    WeatherError::RequestFailed(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::ConnectionFailed(e.without_url().to_string()))?;

        if !status.is_success() {
            let err = Self::status_error(status, &body);
            warn!(status = status.as_u16(), error = %err, "Forecast request rejected");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::ParseError(e.to_string()))
    }

    async fn is_healthy(&self) -> bool {
        self.get_today().await.is_ok()
    }
}
