//! Integration configurations: forecast provider and chat notifier.

use application::NotifierConfig;
use integration_weather::WeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

// ==============================
// Forecast Configuration
// ==============================

/// Forecast provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ForecastAppConfig {
    /// WeatherAPI.com base URL
    #[serde(default = "default_forecast_base_url")]
    pub base_url: String,

    /// API key (prefer `HEATSTREAK_FORECAST__API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Location query, e.g. "Austin", "78701" or "30.27,-97.74"
    #[serde(default)]
    pub location: String,

    /// Number of forecast days requested
    #[serde(default = "default_forecast_days")]
    pub days: u8,

    /// Request timeout in seconds
    #[serde(default = "default_forecast_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ForecastAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("location", &self.location)
            .field("days", &self.days)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_forecast_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_forecast_days() -> u8 {
    1
}

const fn default_forecast_timeout() -> u64 {
    30
}

impl Default for ForecastAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_forecast_base_url(),
            api_key: None,
            location: String::new(),
            days: default_forecast_days(),
            timeout_secs: default_forecast_timeout(),
        }
    }
}

impl ForecastAppConfig {
    /// Whether a non-empty API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Convert to integration_weather config
    #[must_use]
    pub fn to_weather_config(&self) -> WeatherConfig {
        WeatherConfig {
            base_url: self.base_url.clone(),
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().trim().to_string())
                .unwrap_or_default(),
            location: self.location.clone(),
            days: self.days,
            timeout_secs: self.timeout_secs,
        }
    }
}

// ==============================
// Notifier Configuration
// ==============================

/// Chat notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierAppConfig {
    /// Secret holding `{"WEBHOOK_URL": "..."}` (usually from `SECRET_NAME`)
    #[serde(default)]
    pub secret_name: String,

    /// Webhook request timeout in seconds
    #[serde(default = "default_notifier_timeout")]
    pub timeout_secs: u64,

    /// Fail the run when the webhook does not answer 204
    #[serde(default)]
    pub delivery_failure_is_fatal: bool,
}

const fn default_notifier_timeout() -> u64 {
    5
}

impl Default for NotifierAppConfig {
    fn default() -> Self {
        Self {
            secret_name: String::new(),
            timeout_secs: default_notifier_timeout(),
            delivery_failure_is_fatal: false,
        }
    }
}

impl NotifierAppConfig {
    /// Convert to the application-level notifier config
    #[must_use]
    pub fn to_notifier_config(&self) -> NotifierConfig {
        NotifierConfig::new(self.secret_name.clone())
            .with_fatal_delivery(self.delivery_failure_is_fatal)
    }
}
