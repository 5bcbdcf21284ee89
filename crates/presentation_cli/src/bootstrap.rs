//! Start-up wiring
//!
//! Builds every client once from the validated configuration and injects
//! them into the daily run service.

use std::sync::Arc;

use application::ports::{ForecastPort, SecretStorePort};
use application::{ApplicationError, DailyRunService, StreakNotifier};
use infrastructure::adapters::{
    ChainedSecretStore, EnvSecretStore, ForecastAdapter, VaultSecretStore, WebhookAdapter,
};
use infrastructure::config::{AppConfig, VaultAppConfig};
use infrastructure::persistence::Persistence;
use tracing::info;

/// Everything a command needs, built once
pub struct App {
    pub config: AppConfig,
    pub persistence: Persistence,
    pub secrets: Arc<dyn SecretStorePort>,
    pub forecast: Arc<dyn ForecastPort>,
    pub service: Arc<DailyRunService>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Build the secret store selected by the `vault` section
///
/// Vault first with an optional environment fallback when enabled,
/// otherwise environment variables only.
pub async fn build_secret_store(
    vault: &VaultAppConfig,
) -> Result<Arc<dyn SecretStorePort>, ApplicationError> {
    let env_store = vault
        .env_prefix
        .as_ref()
        .map_or_else(EnvSecretStore::new, EnvSecretStore::with_prefix);

    if !vault.enabled {
        info!(prefix = ?vault.env_prefix, "Using environment secret store");
        return Ok(Arc::new(env_store));
    }

    let vault_store: Arc<dyn SecretStorePort> =
        Arc::new(VaultSecretStore::new(vault.to_vault_config()).await?);

    if vault.env_fallback {
        info!(address = %vault.address, "Using Vault secret store with environment fallback");
        Ok(Arc::new(ChainedSecretStore::new(vec![
            vault_store,
            Arc::new(env_store),
        ])))
    } else {
        info!(address = %vault.address, "Using Vault secret store");
        Ok(vault_store)
    }
}

/// Build the application from a validated configuration
pub async fn build(config: AppConfig) -> anyhow::Result<App> {
    let persistence = Persistence::open(&config.database, &config.storage)?;
    let secrets = build_secret_store(&config.vault).await?;

    let forecast: Arc<dyn ForecastPort> = Arc::new(ForecastAdapter::with_config(
        config.forecast.to_weather_config(),
    )?);
    let webhook = Arc::new(WebhookAdapter::new(config.notifier.timeout_secs)?);
    let notifier = StreakNotifier::new(
        Arc::clone(&secrets),
        webhook,
        config.notifier.to_notifier_config(),
    );

    let service = DailyRunService::new(
        Arc::clone(&forecast),
        Arc::new(persistence.history.clone()),
        Arc::new(persistence.counter.clone()),
        Arc::new(notifier),
    )
    .with_threshold(config.threshold.to_threshold()?);

    info!(
        location = %config.forecast.location,
        weather_table = %config.storage.weather_table,
        counter_table = %config.storage.counter_table,
        "Application wired"
    );

    Ok(App {
        config,
        persistence,
        secrets,
        forecast,
        service: Arc::new(service),
    })
}
