//! HashiCorp Vault secret store adapter
//!
//! Reads secrets from the KV v2 secrets engine. Supports token and AppRole
//! authentication. A webhook secret is stored as a KV document with a
//! `WEBHOOK_URL` key.

use std::collections::HashMap;
use std::sync::Arc;

use application::{error::ApplicationError, ports::SecretStorePort};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use vaultrs::{
    client::{Client as _, VaultClient, VaultClientSettingsBuilder},
    error::ClientError,
    kv2,
};

/// Configuration for Vault connection
#[derive(Clone)]
pub struct VaultConfig {
    /// Vault server address (e.g., "https://vault.heatstreak.internal:8200")
    pub address: String,
    /// Authentication token (for token-based auth)
    pub token: Option<String>,
    /// AppRole role ID (for AppRole auth)
    pub role_id: Option<String>,
    /// AppRole secret ID
    pub secret_id: Option<String>,
    /// KV v2 mount path (default: "secret")
    pub mount_path: String,
    /// Namespace (for Vault Enterprise)
    pub namespace: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            role_id: None,
            secret_id: None,
            mount_path: "secret".to_string(),
            namespace: None,
            timeout_secs: 5,
        }
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role_id", &self.role_id)
            .field("secret_id", &self.secret_id.as_ref().map(|_| "[REDACTED]"))
            .field("mount_path", &self.mount_path)
            .field("namespace", &self.namespace)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl VaultConfig {
    /// Create a new Vault configuration with the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_approle(
        mut self,
        role_id: impl Into<String>,
        secret_id: impl Into<String>,
    ) -> Self {
        self.role_id = Some(role_id.into());
        self.secret_id = Some(secret_id.into());
        self
    }

    #[must_use]
    pub fn with_mount_path(mut self, path: impl Into<String>) -> Self {
        self.mount_path = path.into();
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    fn uses_approle(&self) -> bool {
        self.role_id.is_some() && self.secret_id.is_some()
    }
}

/// Secret store that reads from HashiCorp Vault
pub struct VaultSecretStore {
    client: Arc<RwLock<VaultClient>>,
    config: VaultConfig,
}

impl std::fmt::Debug for VaultSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VaultSecretStore {
    /// Create a new Vault secret store
    ///
    /// Logs in with AppRole when both AppRole credentials are set.
    ///
    /// # Errors
    /// `Configuration` when the settings are invalid, `SecretAccess` when the
    /// AppRole login is refused.
    pub async fn new(config: VaultConfig) -> Result<Self, ApplicationError> {
        let mut client = Self::create_client(&config)?;

        if config.uses_approle() {
            Self::authenticate_approle(&mut client, &config).await?;
        }

        info!(address = %config.address, mount = %config.mount_path, "Vault secret store ready");

        Ok(Self {
            client: Arc::new(RwLock::new(client)),
            config,
        })
    }

    fn create_client(config: &VaultConfig) -> Result<VaultClient, ApplicationError> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder
            .address(&config.address)
            .timeout(Some(std::time::Duration::from_secs(config.timeout_secs)));

        if let Some(token) = &config.token {
            settings_builder.token(token);
        }

        if let Some(namespace) = &config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder
            .build()
            .map_err(|e| ApplicationError::Configuration(format!("Invalid Vault config: {e}")))?;

        VaultClient::new(settings).map_err(|e| {
            ApplicationError::Configuration(format!("Failed to create Vault client: {e}"))
        })
    }

    async fn authenticate_approle(
        client: &mut VaultClient,
        config: &VaultConfig,
    ) -> Result<(), ApplicationError> {
        let (Some(role_id), Some(secret_id)) = (&config.role_id, &config.secret_id) else {
            return Err(ApplicationError::Configuration(
                "AppRole requires role_id and secret_id".to_string(),
            ));
        };

        let auth = vaultrs::auth::approle::login(&*client, "approle", role_id, secret_id)
            .await
            .map_err(|e| {
                error!(error = %e, "AppRole authentication failed");
                ApplicationError::SecretAccess(format!("Vault AppRole login failed: {e}"))
            })?;
        client.set_token(&auth.client_token);

        info!("Authenticated with Vault using AppRole");
        Ok(())
    }

    /// Split a secret name into mount and path
    ///
    /// - "heatstreak/webhook" uses the configured mount
    /// - "secret/heatstreak/webhook" and "secret/data/heatstreak/webhook"
    ///   strip the configured mount prefix
    fn parse_path(&self, name: &str) -> (String, String) {
        let mount = &self.config.mount_path;
        let path = name
            .strip_prefix(&format!("{mount}/data/"))
            .or_else(|| name.strip_prefix(&format!("{mount}/")))
            .unwrap_or(name);
        (mount.clone(), path.to_string())
    }

    fn map_error(name: &str, e: &ClientError) -> ApplicationError {
        match e {
            ClientError::APIError { code: 404, .. } => {
                ApplicationError::NotFound(format!("Secret not found: {name}"))
            },
            _ => {
                error!(error = %e, "Failed to read secret from Vault");
                ApplicationError::SecretAccess(format!("Vault read of '{name}' failed: {e}"))
            },
        }
    }
}

#[async_trait]
impl SecretStorePort for VaultSecretStore {
    /// Read the `value` key of a KV document
    #[instrument(skip(self))]
    async fn get_secret(&self, name: &str) -> Result<String, ApplicationError> {
        let (mount, path) = self.parse_path(name);
        let client = self.client.read().await;

        debug!(mount = %mount, path = %path, "Fetching secret from Vault");

        let mut secret: HashMap<String, String> = kv2::read(&*client, &mount, &path)
            .await
            .map_err(|e| Self::map_error(name, &e))?;

        secret
            .remove("value")
            .ok_or_else(|| ApplicationError::SecretAccess(format!("Secret '{name}' has no value key")))
    }

    /// Read a KV document as a JSON object
    #[instrument(skip(self))]
    async fn get_json(&self, name: &str) -> Result<serde_json::Value, ApplicationError> {
        let (mount, path) = self.parse_path(name);
        let client = self.client.read().await;

        debug!(mount = %mount, path = %path, "Fetching JSON secret from Vault");

        kv2::read(&*client, &mount, &path)
            .await
            .map_err(|e| Self::map_error(name, &e))
    }

    #[instrument(skip(self))]
    async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
        let (mount, path) = self.parse_path(name);
        let client = self.client.read().await;

        match kv2::read_metadata(&*client, &mount, &path).await {
            Ok(_) => Ok(true),
            Err(ClientError::APIError { code: 404, .. }) => Ok(false),
            Err(e) => Err(ApplicationError::SecretAccess(format!(
                "Vault metadata check failed: {e}"
            ))),
        }
    }

    async fn is_healthy(&self) -> bool {
        let client = self.client.read().await;
        match vaultrs::sys::health(&*client).await {
            Ok(health) if health.sealed => {
                warn!("Vault is sealed");
                false
            },
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Vault health check failed");
                false
            },
        }
    }
}
