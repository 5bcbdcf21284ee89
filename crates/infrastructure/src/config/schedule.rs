//! Daemon schedule configuration.

use serde::{Deserialize, Serialize};

/// Cron schedule for `heatstreak daemon`
///
/// Six fields with seconds, evaluated in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_cron")]
    pub cron: String,
}

fn default_cron() -> String {
    "0 0 6 * * *".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
        }
    }
}
