//! Vault secret store configuration
//!
//! When enabled, the webhook secret is read from HashiCorp Vault KV v2,
//! optionally falling back to environment variables.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::adapters::VaultConfig;

/// Vault secret store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultAppConfig {
    /// Read secrets from Vault
    #[serde(default)]
    pub enabled: bool,

    /// Vault server address
    #[serde(default = "default_vault_address")]
    pub address: String,

    /// Authentication token (prefer `HEATSTREAK_VAULT__TOKEN`)
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// AppRole role ID (alternative to token auth)
    #[serde(default)]
    pub role_id: Option<String>,

    /// AppRole secret ID (alternative to token auth)
    #[serde(default, skip_serializing)]
    pub secret_id: Option<SecretString>,

    /// KV v2 mount path
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Vault Enterprise namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fall back to environment variables when Vault has no such secret
    #[serde(default = "default_true")]
    pub env_fallback: bool,

    /// Prefix for environment variable lookups
    #[serde(default)]
    pub env_prefix: Option<String>,
}

fn default_vault_address() -> String {
    "http://127.0.0.1:8200".to_string()
}

fn default_mount_path() -> String {
    "secret".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_true() -> bool {
    true
}

impl Default for VaultAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_vault_address(),
            token: None,
            role_id: None,
            secret_id: None,
            mount_path: default_mount_path(),
            namespace: None,
            timeout_secs: default_timeout_secs(),
            env_fallback: true,
            env_prefix: None,
        }
    }
}

impl VaultAppConfig {
    /// Whether token or complete AppRole credentials are present
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.role_id.is_some() && self.secret_id.is_some())
    }

    /// Convert to the adapter-level `VaultConfig`
    #[must_use]
    pub fn to_vault_config(&self) -> VaultConfig {
        let mut config = VaultConfig::new(&self.address).with_mount_path(&self.mount_path);
        config.timeout_secs = self.timeout_secs;

        if let Some(ref token) = self.token {
            config = config.with_token(token.expose_secret());
        }

        if let (Some(role_id), Some(secret_id)) = (&self.role_id, &self.secret_id) {
            config = config.with_approle(role_id, secret_id.expose_secret());
        }

        if let Some(ref ns) = self.namespace {
            config = config.with_namespace(ns);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_disabled() {
        let config = VaultAppConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.address, "http://127.0.0.1:8200");
        assert_eq!(config.mount_path, "secret");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.env_fallback);
        assert!(config.env_prefix.is_none());
        assert!(!config.has_credentials());
    }

    #[test]
    fn to_vault_config_with_token() {
        let config = VaultAppConfig {
            enabled: true,
            address: "http://vault:8200".to_string(),
            mount_path: "kv".to_string(),
            token: Some(SecretString::from("test-token")),
            timeout_secs: 10,
            ..Default::default()
        };

        let vault_config = config.to_vault_config();
        assert_eq!(vault_config.address, "http://vault:8200");
        assert_eq!(vault_config.mount_path, "kv");
        assert_eq!(vault_config.timeout_secs, 10);
        assert_eq!(vault_config.token.as_deref(), Some("test-token"));
        assert!(config.has_credentials());
    }

    #[test]
    fn to_vault_config_with_approle_and_namespace() {
        let config = VaultAppConfig {
            role_id: Some("role-123".to_string()),
            secret_id: Some(SecretString::from("secret-456")),
            namespace: Some("weather".to_string()),
            ..Default::default()
        };

        let vault_config = config.to_vault_config();
        assert_eq!(vault_config.role_id.as_deref(), Some("role-123"));
        assert_eq!(vault_config.secret_id.as_deref(), Some("secret-456"));
        assert_eq!(vault_config.namespace.as_deref(), Some("weather"));
        assert!(config.has_credentials());
    }

    #[test]
    fn role_id_alone_is_not_credentials() {
        let config = VaultAppConfig {
            role_id: Some("role-123".to_string()),
            ..Default::default()
        };
        assert!(!config.has_credentials());
    }

    #[test]
    fn serialization_skips_secrets() {
        let config = VaultAppConfig {
            token: Some(SecretString::from("hvs.abc")),
            secret_id: Some(SecretString::from("sid")),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hvs.abc"));
        assert!(!json.contains("\"sid\""));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: VaultAppConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert!(config.env_fallback);
        assert_eq!(config.mount_path, "secret");
    }
}
