//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: the WeatherAPI.com forecast, the chat
//! webhook, SQLite storage and the secret stores. Also owns configuration,
//! logging and the daemon scheduler.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ConfigError, DatabaseConfig, LoggingConfig, StorageConfig};
pub use persistence::{
    ConnectionPool, DatabaseError, Persistence, SqliteStreakCounter, SqliteWeatherHistoryStore,
    TableName, create_pool,
};
pub use scheduled_tasks::{DAILY_RUN_TASK, create_daily_run_task};
pub use scheduler::{SchedulerError, TaskScheduler, TaskStats};
pub use telemetry::{TelemetryError, init_logging};
