//! Logging initialization
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a pretty
//! or JSON `fmt` layer.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directive does not parse
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Pick the filter directive
///
/// `RUST_LOG` wins, then the CLI override, then the configured filter.
#[must_use]
pub fn resolve_filter(
    rust_log: Option<String>,
    config: &LoggingConfig,
    cli_override: Option<&str>,
) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| cli_override.map(str::to_owned))
        .unwrap_or_else(|| config.filter.clone())
}

/// Parse a filter directive
///
/// # Errors
///
/// Returns `TelemetryError::Filter` if the directive is malformed.
pub fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::Filter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if the filter is malformed or a subscriber is already
/// installed.
pub fn init_logging(
    config: &LoggingConfig,
    cli_override: Option<&str>,
) -> Result<(), TelemetryError> {
    let filter = resolve_filter(std::env::var("RUST_LOG").ok(), config, cli_override);
    let env_filter = parse_filter(&filter)?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(filter = %filter, format = %config.format, "Logging initialized");
    Ok(())
}
