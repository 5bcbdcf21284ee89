//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod forecast_port;
mod secret_store;
mod streak_counter_port;
mod weather_history_port;
mod webhook_port;

#[cfg(test)]
pub use forecast_port::MockForecastPort;
pub use forecast_port::ForecastPort;
pub use secret_store::{SecretStoreExt, SecretStorePort};
pub use streak_counter_port::StreakCounterPort;
pub use weather_history_port::WeatherHistoryPort;
#[cfg(test)]
pub use webhook_port::MockWebhookPort;
pub use webhook_port::{WebhookPort, WebhookResponse};
