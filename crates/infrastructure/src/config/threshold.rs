//! Hot-and-dry threshold configuration.

use domain::{DomainError, Fahrenheit, HotDryThreshold, Inches};
use serde::{Deserialize, Serialize};

/// Threshold configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// The forecast high must be strictly above this (°F)
    #[serde(default = "default_min_temperature")]
    pub min_temperature_f: f64,

    /// The forecast rainfall must be strictly below this (inches)
    #[serde(default = "default_max_precipitation")]
    pub max_precipitation_in: f64,
}

const fn default_min_temperature() -> f64 {
    HotDryThreshold::DEFAULT_MIN_TEMPERATURE_F
}

const fn default_max_precipitation() -> f64 {
    HotDryThreshold::DEFAULT_MAX_PRECIPITATION_IN
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_temperature_f: default_min_temperature(),
            max_precipitation_in: default_max_precipitation(),
        }
    }
}

impl ThresholdConfig {
    /// Convert to the domain threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the temperature is not finite or the rainfall is
    /// negative or not finite.
    pub fn to_threshold(&self) -> Result<HotDryThreshold, DomainError> {
        Ok(HotDryThreshold::new(
            Fahrenheit::new(self.min_temperature_f)?,
            Inches::new(self.max_precipitation_in)?,
        ))
    }
}
