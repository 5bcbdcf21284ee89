//! Temperature value object
//!
//! A finite temperature in degrees Fahrenheit.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Fahrenheit;
//!
//! let t = Fahrenheit::new(90.0).expect("finite temperature");
//! assert_eq!(t.to_string(), "90.00");
//!
//! assert!(Fahrenheit::new(f64::NAN).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Temperature in degrees Fahrenheit
///
/// Always finite. Displays with exactly two decimals, which is the
/// representation persisted in the weather history.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Fahrenheit(pub(crate) f64);

impl Fahrenheit {
    /// Create a validated temperature
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTemperature` if the value is NaN or infinite.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidTemperature(value.to_string()))
        }
    }

    /// Get the raw value in °F
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fahrenheit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Fahrenheit {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Fahrenheit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
