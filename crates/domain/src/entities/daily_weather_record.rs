//! Daily weather record
//!
//! One row of weather history: the forecast high and rainfall for a
//! calendar day. The date is the identity; a second record for the same day
//! replaces the first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DailyForecast, DomainError, Fahrenheit, Inches};

/// Format of the persisted date key (`MM-DD-YYYY`)
pub const DATE_KEY_FORMAT: &str = "%m-%d-%Y";

/// Weather observed (forecast) for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    /// Calendar day this record belongs to
    pub date: NaiveDate,
    /// Forecast high temperature
    pub high_temperature: Fahrenheit,
    /// Forecast rainfall
    pub rainfall: Inches,
}

impl DailyWeatherRecord {
    /// Create a record for the given day
    #[must_use]
    pub const fn new(date: NaiveDate, high_temperature: Fahrenheit, rainfall: Inches) -> Self {
        Self {
            date,
            high_temperature,
            rainfall,
        }
    }

    /// Build the record for `date` from a forecast
    #[must_use]
    pub const fn from_forecast(date: NaiveDate, forecast: &DailyForecast) -> Self {
        Self::new(date, forecast.max_temperature, forecast.total_precipitation)
    }

    /// The storage key, e.g. `07-04-2025`
    #[must_use]
    pub fn date_key(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }

    /// The `High` attribute, two decimals
    #[must_use]
    pub fn high_attribute(&self) -> String {
        self.high_temperature.to_string()
    }

    /// The `Rainfall` attribute, two decimals
    #[must_use]
    pub fn rainfall_attribute(&self) -> String {
        self.rainfall.to_string()
    }

    /// Parse a storage key back into a date
    pub fn parse_date_key(key: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
            .map_err(|e| DomainError::InvalidDate(format!("{key}: {e}")))
    }

    /// Rebuild a record from its stored attributes
    pub fn from_attributes(date_key: &str, high: &str, rainfall: &str) -> Result<Self, DomainError> {
        let date = Self::parse_date_key(date_key)?;
        let high = high
            .trim()
            .parse::<f64>()
            .map_err(|e| DomainError::InvalidTemperature(format!("{high}: {e}")))?;
        let rainfall = rainfall
            .trim()
            .parse::<f64>()
            .map_err(|e| DomainError::InvalidRainfall(format!("{rainfall}: {e}")))?;

        Ok(Self::new(date, Fahrenheit::new(high)?, Inches::new(rainfall)?))
    }
}
