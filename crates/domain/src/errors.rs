//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Temperature is not a finite number
    #[error("Invalid temperature: {0}")]
    InvalidTemperature(String),

    /// Rainfall is negative or not a finite number
    #[error("Invalid rainfall: {0}")]
    InvalidRainfall(String),

    /// Date key could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_temperature_error_message() {
        let err = DomainError::InvalidTemperature("NaN".to_string());
        assert_eq!(err.to_string(), "Invalid temperature: NaN");
    }

    #[test]
    fn invalid_rainfall_error_message() {
        let err = DomainError::InvalidRainfall("-1".to_string());
        assert_eq!(err.to_string(), "Invalid rainfall: -1");
    }

    #[test]
    fn invalid_date_error_message() {
        let err = DomainError::InvalidDate("13-45-2025".to_string());
        assert_eq!(err.to_string(), "Invalid date: 13-45-2025");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("counter id is empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: counter id is empty");
    }
}
