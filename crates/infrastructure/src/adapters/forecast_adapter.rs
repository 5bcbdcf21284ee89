//! Forecast adapter - Implements ForecastPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use domain::{DailyForecast, Fahrenheit, Inches};
use integration_weather::{
    DaySummary, WeatherApiClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for the WeatherAPI.com forecast
pub struct ForecastAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for ForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAdapter")
            .field("client", &"WeatherClient")
            .finish()
    }
}

impl ForecastAdapter {
    /// Create an adapter backed by a `WeatherApiClient`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = WeatherApiClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Create an adapter over any weather client
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        if err.is_format_error() {
            ApplicationError::Format(err.to_string())
        } else {
            ApplicationError::Transport(err.to_string())
        }
    }

    /// Validate the day's values into domain types
    fn map_day(day: &DaySummary) -> Result<DailyForecast, ApplicationError> {
        let high = Fahrenheit::new(day.maxtemp_f)
            .map_err(|e| ApplicationError::Format(format!("maxtemp_f: {e}")))?;
        let rain = Inches::new(day.totalprecip_in)
            .map_err(|e| ApplicationError::Format(format!("totalprecip_in: {e}")))?;
        Ok(DailyForecast::new(high, rain))
    }
}

#[async_trait]
impl ForecastPort for ForecastAdapter {
    #[instrument(skip(self))]
    async fn fetch_forecast(&self) -> Result<DailyForecast, ApplicationError> {
        let day = self.client.get_today().await.map_err(Self::map_error)?;
        debug!(
            maxtemp_f = day.maxtemp_f,
            totalprecip_in = day.totalprecip_in,
            "Retrieved forecast day"
        );
        Self::map_day(&day)
    }

    async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}
