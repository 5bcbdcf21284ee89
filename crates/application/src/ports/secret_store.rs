//! Port for secret retrieval
//!
//! The webhook URL lives in a secret store rather than in configuration so
//! that it can be rotated without redeploying.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApplicationError;

/// Port for secret storage operations
///
/// Implementations exist for environment variables, HashiCorp Vault and a
/// chain of both. The trait is object-safe; typed retrieval lives in
/// [`SecretStoreExt`].
#[async_trait]
pub trait SecretStorePort: Send + Sync {
    /// Retrieve a secret string by name
    ///
    /// # Errors
    /// `ApplicationError::NotFound` when no secret has this name,
    /// `ApplicationError::SecretAccess` when the backend refuses or fails.
    async fn get_secret(&self, name: &str) -> Result<String, ApplicationError>;

    /// Retrieve a secret and parse it as a JSON document
    async fn get_json(&self, name: &str) -> Result<serde_json::Value, ApplicationError>;

    /// Check if a secret exists
    async fn exists(&self, name: &str) -> Result<bool, ApplicationError>;

    /// Check if the backend is reachable
    async fn is_healthy(&self) -> bool;
}

/// Extension trait for typed secret retrieval
#[async_trait]
pub trait SecretStoreExt: SecretStorePort {
    /// Retrieve a JSON secret and deserialize it into `T`
    ///
    /// A document that does not match `T` is a `SecretAccess` error.
    async fn get_typed<T: DeserializeOwned + Send>(
        &self,
        name: &str,
    ) -> Result<T, ApplicationError> {
        let value = self.get_json(name).await?;
        serde_json::from_value(value).map_err(|e| {
            ApplicationError::SecretAccess(format!("Secret '{name}' has unexpected shape: {e}"))
        })
    }
}

impl<S: SecretStorePort + ?Sized> SecretStoreExt for S {}
