//! Application services - Use case implementations

mod daily_run_service;
mod streak_notifier;

pub use daily_run_service::{DailyRunReport, DailyRunService};
pub use streak_notifier::{DeliveryReport, NotifierConfig, StreakNotifier, format_message};
