//! Secret store that tries several backends in order

use std::sync::Arc;

use application::{error::ApplicationError, ports::SecretStorePort};
use async_trait::async_trait;
use tracing::debug;

/// Combined secret store
///
/// Backends are consulted in order. `NotFound` moves on to the next backend;
/// any other error is remembered and returned if no later backend has the
/// secret.
pub struct ChainedSecretStore {
    stores: Vec<Arc<dyn SecretStorePort>>,
}

impl std::fmt::Debug for ChainedSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedSecretStore")
            .field("stores_count", &self.stores.len())
            .finish()
    }
}

impl ChainedSecretStore {
    pub fn new(stores: Vec<Arc<dyn SecretStorePort>>) -> Self {
        Self { stores }
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[async_trait]
impl SecretStorePort for ChainedSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, ApplicationError> {
        let mut last_error = None;

        for (index, store) in self.stores.iter().enumerate() {
            match store.get_secret(name).await {
                Ok(value) => return Ok(value),
                Err(ApplicationError::NotFound(_)) => {
                    debug!(index, "Secret not in backend, trying next");
                },
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ApplicationError::NotFound(format!("Secret not found in any store: {name}"))
        }))
    }

    async fn get_json(&self, name: &str) -> Result<serde_json::Value, ApplicationError> {
        let mut last_error = None;

        for (index, store) in self.stores.iter().enumerate() {
            match store.get_json(name).await {
                Ok(value) => return Ok(value),
                Err(ApplicationError::NotFound(_)) => {
                    debug!(index, "Secret not in backend, trying next");
                },
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ApplicationError::NotFound(format!("Secret not found in any store: {name}"))
        }))
    }

    async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
        for store in &self.stores {
            if store.exists(name).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Healthy if at least one backend is healthy
    async fn is_healthy(&self) -> bool {
        for store in &self.stores {
            if store.is_healthy().await {
                return true;
            }
        }
        false
    }
}
