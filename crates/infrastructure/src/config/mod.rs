//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database and table names
//! - `integrations`: forecast provider and chat notifier
//! - `threshold`: hot-and-dry thresholds
//! - `schedule`: daemon cron schedule
//! - `logging`: tracing filter and output format
//! - `vault`: HashiCorp Vault secret store
//!
//! Sources, lowest precedence first: built-in defaults, `config.toml` (or an
//! explicit file), `HEATSTREAK_*` environment variables using `__` as the
//! nesting separator, then `WEATHER_TABLE`, `COUNTER_TABLE` and
//! `SECRET_NAME`.

mod database;
mod integrations;
mod logging;
mod schedule;
mod threshold;
mod vault;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use database::{DatabaseConfig, StorageConfig};
pub use integrations::{ForecastAppConfig, NotifierAppConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use schedule::ScheduleConfig;
pub use threshold::ThresholdConfig;
pub use vault::VaultAppConfig;

use crate::persistence::TableName;

/// Prefix of the layered environment variables
pub const ENV_PREFIX: &str = "HEATSTREAK";

/// Environment variable naming the weather history table
pub const WEATHER_TABLE_VAR: &str = "WEATHER_TABLE";

/// Environment variable naming the streak counter table
pub const COUNTER_TABLE_VAR: &str = "COUNTER_TABLE";

/// Environment variable naming the webhook secret
pub const SECRET_NAME_VAR: &str = "SECRET_NAME";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table names
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chat notifier
    #[serde(default)]
    pub notifier: NotifierAppConfig,

    /// Forecast provider
    #[serde(default)]
    pub forecast: ForecastAppConfig,

    /// Hot-and-dry thresholds
    #[serde(default)]
    pub threshold: ThresholdConfig,

    /// SQLite database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Daemon schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Vault secret store
    #[serde(default)]
    pub vault: VaultAppConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and an optional file
    ///
    /// Without an explicit path, `config.toml` in the working directory is
    /// read if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be read or the result
    /// does not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(path, &env)
    }

    /// Load configuration from an explicit set of environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be read or the result
    /// does not deserialize.
    pub fn load_from(
        path: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let layered_env = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(
                env.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ));

        let config = config::Config::builder()
            .add_source(file)
            .add_source(layered_env)
            .set_override_option("storage.weather_table", env.get(WEATHER_TABLE_VAR).cloned())?
            .set_override_option("storage.counter_table", env.get(COUNTER_TABLE_VAR).cloned())?
            .set_override_option("notifier.secret_name", env.get(SECRET_NAME_VAR).cloned())?
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(config = ?app, "Configuration loaded");
        Ok(app)
    }

    /// Check that everything a run needs is present and well-formed
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for absent required values and
    /// `ConfigError::Invalid` for malformed ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_persistence()?;
        self.validate_notifier()?;
        self.validate_forecast()?;

        self.threshold
            .to_threshold()
            .map_err(|e| ConfigError::Invalid(format!("threshold: {e}")))?;

        cron::Schedule::from_str(&self.schedule.cron).map_err(|e| {
            ConfigError::Invalid(format!("schedule.cron '{}': {e}", self.schedule.cron))
        })?;

        if self.vault.enabled && !self.vault.has_credentials() {
            return Err(ConfigError::Missing(
                "vault.token or vault.role_id with vault.secret_id".to_string(),
            ));
        }

        Ok(())
    }

    /// Check only the table and database settings
    ///
    /// Enough for commands that read the store without a daily run.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::validate`], limited to `storage` and `database`.
    pub fn validate_persistence(&self) -> Result<(), ConfigError> {
        self.validate_storage()?;

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Missing("database.path".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.is_in_memory() && self.database.max_connections != 1 {
            return Err(ConfigError::Invalid(
                "an in-memory database needs database.max_connections = 1".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        let weather = required_table(&self.storage.weather_table, WEATHER_TABLE_VAR)?;
        let counter = required_table(&self.storage.counter_table, COUNTER_TABLE_VAR)?;
        if weather.as_str().eq_ignore_ascii_case(counter.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "{WEATHER_TABLE_VAR} and {COUNTER_TABLE_VAR} must name different tables"
            )));
        }
        if self.storage.counter_id.trim().is_empty() {
            return Err(ConfigError::Missing("storage.counter_id".to_string()));
        }
        Ok(())
    }

    fn validate_notifier(&self) -> Result<(), ConfigError> {
        if self.notifier.secret_name.trim().is_empty() {
            return Err(ConfigError::Missing(SECRET_NAME_VAR.to_string()));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "notifier.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_forecast(&self) -> Result<(), ConfigError> {
        if !self.forecast.has_api_key() {
            return Err(ConfigError::Missing("forecast.api_key".to_string()));
        }
        if self.forecast.location.trim().is_empty() {
            return Err(ConfigError::Missing("forecast.location".to_string()));
        }
        if self.forecast.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("forecast.base_url".to_string()));
        }
        if self.forecast.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "forecast.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !(1..=14).contains(&self.forecast.days) {
            return Err(ConfigError::Invalid(
                "forecast.days must be between 1 and 14".to_string(),
            ));
        }
        Ok(())
    }
}

fn required_table(name: &str, var: &str) -> Result<TableName, ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Missing(var.to_string()));
    }
    TableName::new(name).map_err(|e| ConfigError::Invalid(format!("{var}: {e}")))
}
