//! Hot-and-dry classification
//!
//! A day counts toward the streak when its forecast high is strictly above
//! the temperature threshold and its forecast rainfall is strictly below the
//! precipitation threshold.

use serde::{Deserialize, Serialize};

use crate::{DailyForecast, Fahrenheit, Inches};

/// Thresholds that decide whether a day is hot and dry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotDryThreshold {
    /// The high must exceed this temperature
    pub min_temperature: Fahrenheit,
    /// The rainfall must stay below this amount
    pub max_precipitation: Inches,
}

impl HotDryThreshold {
    /// Default temperature threshold in °F
    pub const DEFAULT_MIN_TEMPERATURE_F: f64 = 85.0;
    /// Default precipitation threshold in inches
    pub const DEFAULT_MAX_PRECIPITATION_IN: f64 = 0.05;

    /// Create a threshold from validated parts
    #[must_use]
    pub const fn new(min_temperature: Fahrenheit, max_precipitation: Inches) -> Self {
        Self {
            min_temperature,
            max_precipitation,
        }
    }

    /// Whether the forecast describes a hot-and-dry day
    #[must_use]
    pub fn is_hot_and_dry(&self, forecast: &DailyForecast) -> bool {
        forecast.max_temperature.value() > self.min_temperature.value()
            && forecast.total_precipitation.value() < self.max_precipitation.value()
    }
}

impl Default for HotDryThreshold {
    fn default() -> Self {
        Self {
            min_temperature: Fahrenheit(Self::DEFAULT_MIN_TEMPERATURE_F),
            max_precipitation: Inches(Self::DEFAULT_MAX_PRECIPITATION_IN),
        }
    }
}
