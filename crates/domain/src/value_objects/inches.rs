//! Precipitation value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Precipitation amount in inches
///
/// Always finite and non-negative. A negative zero is normalised to zero so
/// that it never renders as `-0.00`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Inches(pub(crate) f64);

impl Inches {
    /// No precipitation
    pub const ZERO: Self = Self(0.0);

    /// Create a validated precipitation amount
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRainfall` if the value is negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidRainfall(value.to_string()));
        }
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// Get the raw value in inches
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Inches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Inches {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Inches {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
