//! Environment-based secret store adapter
//!
//! Reads secrets from environment variables. The webhook secret is a JSON
//! document, so a deployment sets e.g.
//! `HEATSTREAK_WEBHOOK='{"WEBHOOK_URL": "https://..."}'`.

use std::collections::HashMap;
use std::env;

use application::{error::ApplicationError, ports::SecretStorePort};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Where variables are looked up
#[derive(Debug, Clone, Default)]
enum EnvSource {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    fn lookup(&self, name: &str) -> Result<Option<String>, env::VarError> {
        match self {
            Self::Process => match env::var(name) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(e) => Err(e),
            },
            Self::Fixed(vars) => Ok(vars.get(name).cloned()),
        }
    }
}

/// Secret store that reads from environment variables
///
/// Secret names are uppercased with `/` and `-` replaced by `_`, so
/// `heatstreak/webhook` becomes `HEATSTREAK_WEBHOOK`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    prefix: Option<String>,
    source: EnvSource,
}

impl EnvSecretStore {
    /// Create a store over the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a prefix for all variable lookups
    ///
    /// # Example
    /// ```
    /// use infrastructure::adapters::EnvSecretStore;
    ///
    /// let store = EnvSecretStore::with_prefix("HEATSTREAK");
    /// // "chat/webhook" is read from HEATSTREAK_CHAT_WEBHOOK
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            source: EnvSource::Process,
        }
    }

    /// Create a store over a fixed set of variables instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self {
            prefix: None,
            source: EnvSource::Fixed(vars),
        }
    }

    /// Set the variable prefix
    #[must_use]
    pub fn prefixed(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Transform a secret name to an environment variable name
    fn key_to_env_var(&self, key: &str) -> String {
        let normalized = key.replace(['/', '-'], "_").to_uppercase();

        match &self.prefix {
            Some(prefix) => format!("{prefix}_{normalized}"),
            None => normalized,
        }
    }
}

#[async_trait]
impl SecretStorePort for EnvSecretStore {
    #[instrument(skip(self), fields(env_var = tracing::field::Empty))]
    async fn get_secret(&self, name: &str) -> Result<String, ApplicationError> {
        let env_var = self.key_to_env_var(name);
        tracing::Span::current().record("env_var", env_var.as_str());

        match self.source.lookup(&env_var) {
            Ok(Some(value)) => {
                debug!("Retrieved secret from environment variable");
                Ok(value)
            },
            Ok(None) => Err(ApplicationError::NotFound(format!(
                "Secret not found: {name} (env: {env_var})"
            ))),
            Err(_) => Err(ApplicationError::SecretAccess(format!(
                "Secret contains invalid UTF-8: {env_var}"
            ))),
        }
    }

    async fn get_json(&self, name: &str) -> Result<serde_json::Value, ApplicationError> {
        let value = self.get_secret(name).await?;
        serde_json::from_str(&value).map_err(|e| {
            ApplicationError::SecretAccess(format!("Secret '{name}' is not valid JSON: {e}"))
        })
    }

    async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
        let env_var = self.key_to_env_var(name);
        Ok(matches!(self.source.lookup(&env_var), Ok(Some(_))))
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
