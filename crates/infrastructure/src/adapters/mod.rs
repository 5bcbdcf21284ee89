//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod chained_secret_store;
mod env_secret_store;
mod forecast_adapter;
mod vault_secret_store;
mod webhook_adapter;

pub use chained_secret_store::ChainedSecretStore;
pub use env_secret_store::EnvSecretStore;
pub use forecast_adapter::ForecastAdapter;
pub use vault_secret_store::{VaultConfig, VaultSecretStore};
pub use webhook_adapter::WebhookAdapter;
