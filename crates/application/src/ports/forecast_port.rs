//! Forecast service port
//!
//! Defines the interface for retrieving today's forecast for the configured
//! location.

use async_trait::async_trait;
use domain::DailyForecast;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forecast retrieval
///
/// The location and forecast window are fixed by the adapter's
/// configuration; callers only ask for "today".
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch the first forecast day's maximum temperature and total precipitation
    ///
    /// # Errors
    /// `ApplicationError::Transport` when the provider cannot be reached or
    /// answers with an error status, `ApplicationError::Format` when the body
    /// is not the expected JSON.
    async fn fetch_forecast(&self) -> Result<DailyForecast, ApplicationError>;

    /// Check if the forecast provider is reachable with the configured credentials
    async fn is_healthy(&self) -> bool;
}
