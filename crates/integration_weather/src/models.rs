//! Forecast response models
//!
//! Only the two fields heatstreak reads are modelled. Everything else in
//! the response is ignored whatever its shape.

use serde::{Deserialize, Serialize};

/// Body of a `forecast.json` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Forecast block
    pub forecast: ForecastBlock,
}

impl ForecastResponse {
    /// First forecast day, which is "today" for the resolved location
    #[must_use]
    pub fn first_day(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBlock {
    pub forecastday: Vec<ForecastDay>,
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Daily aggregate values
    pub day: DaySummary,
}

/// Daily aggregate values of a forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Maximum temperature in °F
    pub maxtemp_f: f64,
    /// Total precipitation in inches
    pub totalprecip_in: f64,
}

/// Error document returned with 4xx responses
///
/// `{"error": {"code": 2006, "message": "API key is invalid."}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    /// Provider error code, e.g. 1006 for an unknown location
    pub code: u32,
    pub message: String,
}
