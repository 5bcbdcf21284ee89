//! Task closures for the scheduler
//!
//! The daemon registers a single task that performs one daily run.

use std::sync::Arc;

use application::DailyRunService;
use futures::future::BoxFuture;
use tracing::{error, info};

/// Task name of the daily run
pub const DAILY_RUN_TASK: &str = "daily_run";

/// Create the daily run task closure
///
/// Each firing runs for the local calendar date. The report is logged; an
/// error is logged and returned so the scheduler counts the failure.
pub fn create_daily_run_task(
    service: Arc<DailyRunService>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let service = Arc::clone(&service);

        Box::pin(async move {
            match service.run(None).await {
                Ok(report) => {
                    info!(
                        date = %report.record.date_key(),
                        high = %report.record.high_attribute(),
                        rainfall = %report.record.rainfall_attribute(),
                        hot_and_dry = report.hot_and_dry,
                        streak = %report.streak,
                        delivery = %report.delivery,
                        "Daily run completed"
                    );
                    Ok(())
                },
                Err(e) => {
                    error!(error = %e, "Daily run failed");
                    Err(format!("Daily run failed: {e}"))
                },
            }
        })
    }
}
