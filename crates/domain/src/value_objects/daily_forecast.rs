//! Daily forecast summary

use serde::{Deserialize, Serialize};

use super::{Fahrenheit, Inches};

/// The two figures of a one-day forecast that drive the streak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast maximum temperature
    pub max_temperature: Fahrenheit,
    /// Forecast total precipitation
    pub total_precipitation: Inches,
}

impl DailyForecast {
    /// Create a forecast from validated parts
    #[must_use]
    pub const fn new(max_temperature: Fahrenheit, total_precipitation: Inches) -> Self {
        Self {
            max_temperature,
            total_precipitation,
        }
    }
}
