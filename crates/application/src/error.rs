//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Every variant propagates to the invocation boundary. Webhook delivery
/// failures are the only outcome the notifier may swallow.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Network failure, timeout or unexpected status from a remote API
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body is malformed or lacks expected fields
    #[error("Format error: {0}")]
    Format(String),

    /// Persistence layer read or write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Secret could not be retrieved or is malformed
    #[error("Secret access error: {0}")]
    SecretAccess(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
