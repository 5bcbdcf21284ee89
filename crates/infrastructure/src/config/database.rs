//! Database (SQLite) and table configuration.

use serde::{Deserialize, Serialize};

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a connection waits on a locked database, in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

fn default_db_path() -> String {
    "heatstreak.db".to_string()
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_busy_timeout_ms() -> u32 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// In-memory database with a single connection
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool
    /// must not grow past one.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Table names and the counter row key
///
/// `weather_table` and `counter_table` are usually supplied through the
/// `WEATHER_TABLE` and `COUNTER_TABLE` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Table holding one weather record per date
    #[serde(default)]
    pub weather_table: String,

    /// Table holding the streak counter row
    #[serde(default)]
    pub counter_table: String,

    /// Key of the counter row
    #[serde(default = "default_counter_id")]
    pub counter_id: String,
}

fn default_counter_id() -> String {
    "Counter".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            weather_table: String::new(),
            counter_table: String::new(),
            counter_id: default_counter_id(),
        }
    }
}
