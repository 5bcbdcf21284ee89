//! Daily run use case
//!
//! One invocation: fetch today's forecast, persist it, update the streak and
//! post the streak to chat. Steps run strictly in order. Any failure aborts
//! the run except a webhook response other than 204.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use domain::{DailyWeatherRecord, HotDryThreshold, StreakCount};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::{ForecastPort, StreakCounterPort, WeatherHistoryPort};
use crate::services::streak_notifier::{DeliveryReport, StreakNotifier};

/// Result of a completed daily run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRunReport {
    /// Record written to the weather history
    pub record: DailyWeatherRecord,
    /// Whether the day met the hot-and-dry threshold
    pub hot_and_dry: bool,
    /// Streak value after the counter step
    pub streak: StreakCount,
    /// Outcome of the chat notification
    #[serde(serialize_with = "serialize_display")]
    pub delivery: DeliveryReport,
}

fn serialize_display<S: serde::Serializer>(
    value: &DeliveryReport,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Orchestrates one daily invocation
pub struct DailyRunService {
    forecast: Arc<dyn ForecastPort>,
    history: Arc<dyn WeatherHistoryPort>,
    counter: Arc<dyn StreakCounterPort>,
    notifier: Arc<StreakNotifier>,
    threshold: HotDryThreshold,
}

impl fmt::Debug for DailyRunService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyRunService")
            .field("threshold", &self.threshold)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl DailyRunService {
    /// Create a service using the default 85 °F / 0.05 in threshold
    #[must_use]
    pub fn new(
        forecast: Arc<dyn ForecastPort>,
        history: Arc<dyn WeatherHistoryPort>,
        counter: Arc<dyn StreakCounterPort>,
        notifier: Arc<StreakNotifier>,
    ) -> Self {
        Self {
            forecast,
            history,
            counter,
            notifier,
            threshold: HotDryThreshold::default(),
        }
    }

    /// Replace the hot-and-dry threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: HotDryThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub const fn threshold(&self) -> &HotDryThreshold {
        &self.threshold
    }

    /// Run for `date`, or for the local calendar date when `None`
    pub async fn run(&self, date: Option<NaiveDate>) -> Result<DailyRunReport, ApplicationError> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        self.run_for_date(date).await
    }

    /// Run the full pipeline for a specific date
    #[instrument(skip(self), fields(date = %date))]
    pub async fn run_for_date(&self, date: NaiveDate) -> Result<DailyRunReport, ApplicationError> {
        let forecast = self.forecast.fetch_forecast().await?;
        info!(
            high = %forecast.max_temperature,
            rainfall = %forecast.total_precipitation,
            "Fetched forecast"
        );

        let record = DailyWeatherRecord::from_forecast(date, &forecast);
        self.history.record_day(&record).await?;

        let hot_and_dry = self.threshold.is_hot_and_dry(&forecast);
        let streak = self.counter.read_or_increment(hot_and_dry).await?;
        info!(hot_and_dry, streak = %streak, "Streak updated");

        let delivery = self.notifier.notify(streak).await?;

        Ok(DailyRunReport {
            record,
            hot_and_dry,
            streak,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockForecastPort, MockWebhookPort, WebhookResponse};
    use crate::services::streak_notifier::NotifierConfig;
    use crate::testing::{InMemorySecretStore, InMemoryStreakCounter, InMemoryWeatherHistory};
    use domain::{DailyForecast, Fahrenheit, Inches};
    use mockall::predicate::{always, eq};

    const SECRET: &str = "heatstreak/webhook";
    const HOOK: &str = "https://chat.example/hook";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn forecast_of(high: f64, rain: f64) -> MockForecastPort {
        let forecast = DailyForecast::new(Fahrenheit::new(high).unwrap(), Inches::new(rain).unwrap());
        let mut port = MockForecastPort::new();
        port.expect_fetch_forecast()
            .times(1)
            .returning(move || Ok(forecast));
        port
    }

    fn secrets() -> Arc<InMemorySecretStore> {
        Arc::new(
            InMemorySecretStore::new()
                .with_secret(SECRET, format!(r#"{{"WEBHOOK_URL": "{HOOK}"}}"#)),
        )
    }

    fn webhook_expecting(content: &'static str, status: u16) -> MockWebhookPort {
        let mut webhook = MockWebhookPort::new();
        webhook
            .expect_post_message()
            .with(eq(HOOK), eq(content))
            .times(1)
            .returning(move |_, _| Ok(WebhookResponse { status }));
        webhook
    }

    struct Fixture {
        history: Arc<InMemoryWeatherHistory>,
        counter: Arc<InMemoryStreakCounter>,
        service: DailyRunService,
    }

    fn fixture(
        forecast: MockForecastPort,
        counter: InMemoryStreakCounter,
        secrets: Arc<InMemorySecretStore>,
        webhook: MockWebhookPort,
    ) -> Fixture {
        let history = Arc::new(InMemoryWeatherHistory::default());
        let counter = Arc::new(counter);
        let notifier = Arc::new(StreakNotifier::new(
            secrets,
            Arc::new(webhook),
            NotifierConfig::new(SECRET),
        ));
        let service = DailyRunService::new(
            Arc::new(forecast),
            Arc::clone(&history) as Arc<dyn WeatherHistoryPort>,
            Arc::clone(&counter) as Arc<dyn StreakCounterPort>,
            notifier,
        );
        Fixture {
            history,
            counter,
            service,
        }
    }

    #[tokio::test]
    async fn hot_dry_day_increments_streak() {
        let f = fixture(
            forecast_of(90.0, 0.0),
            InMemoryStreakCounter::starting_at(4),
            secrets(),
            webhook_expecting("It has been 5 hot days since it rained", 204),
        );

        let report = f.service.run(Some(date())).await.unwrap();

        assert!(report.hot_and_dry);
        assert_eq!(report.streak, StreakCount::new(5));
        assert_eq!(report.delivery, DeliveryReport::Accepted);
        assert_eq!(report.record.high_attribute(), "90.00");
        assert_eq!(report.record.rainfall_attribute(), "0.00");
        assert_eq!(report.record.date_key(), "07-15-2024");
        assert_eq!(f.counter.value().await, Some(5));

        let stored = f.history.find_by_date(date()).await.unwrap().unwrap();
        assert_eq!(stored, report.record);
    }

    #[tokio::test]
    async fn rainy_day_keeps_streak() {
        let f = fixture(
            forecast_of(70.0, 1.2),
            InMemoryStreakCounter::starting_at(5),
            secrets(),
            webhook_expecting("It has been 5 hot days since it rained", 204),
        );

        let report = f.service.run(Some(date())).await.unwrap();

        assert!(!report.hot_and_dry);
        assert_eq!(report.streak, StreakCount::new(5));
        assert_eq!(report.record.high_attribute(), "70.00");
        assert_eq!(report.record.rainfall_attribute(), "1.20");
        assert_eq!(f.counter.value().await, Some(5));
    }

    #[tokio::test]
    async fn hot_but_wet_day_keeps_streak() {
        let f = fixture(
            forecast_of(95.0, 0.05),
            InMemoryStreakCounter::starting_at(2),
            secrets(),
            webhook_expecting("It has been 2 hot days since it rained", 204),
        );

        let report = f.service.run(Some(date())).await.unwrap();
        assert!(!report.hot_and_dry);
        assert_eq!(f.counter.value().await, Some(2));
    }

    #[tokio::test]
    async fn first_hot_day_creates_counter() {
        let f = fixture(
            forecast_of(88.0, 0.0),
            InMemoryStreakCounter::default(),
            secrets(),
            webhook_expecting("It has been 1 hot days since it rained", 204),
        );

        let report = f.service.run(Some(date())).await.unwrap();
        assert_eq!(report.streak, StreakCount::new(1));
    }

    #[tokio::test]
    async fn rejected_delivery_completes_run() {
        let f = fixture(
            forecast_of(90.0, 0.0),
            InMemoryStreakCounter::starting_at(0),
            secrets(),
            webhook_expecting("It has been 1 hot days since it rained", 404),
        );

        let report = f.service.run(Some(date())).await.unwrap();
        assert_eq!(report.delivery, DeliveryReport::Rejected { status: 404 });
    }

    #[tokio::test]
    async fn secret_failure_aborts_after_counter_step() {
        let mut webhook = MockWebhookPort::new();
        webhook.expect_post_message().never();

        let f = fixture(
            forecast_of(90.0, 0.0),
            InMemoryStreakCounter::starting_at(4),
            Arc::new(InMemorySecretStore::denied()),
            webhook,
        );

        let result = f.service.run(Some(date())).await;

        assert!(matches!(result, Err(ApplicationError::SecretAccess(_))));
        assert_eq!(f.counter.value().await, Some(5));
        assert_eq!(f.history.len().await, 1);
    }

    #[tokio::test]
    async fn forecast_failure_aborts_before_persisting() {
        let mut forecast = MockForecastPort::new();
        forecast
            .expect_fetch_forecast()
            .returning(|| Err(ApplicationError::Transport("connection refused".into())));
        let mut webhook = MockWebhookPort::new();
        webhook.expect_post_message().never();

        let f = fixture(
            forecast,
            InMemoryStreakCounter::starting_at(4),
            secrets(),
            webhook,
        );

        let result = f.service.run(Some(date())).await;

        assert!(matches!(result, Err(ApplicationError::Transport(_))));
        assert_eq!(f.history.len().await, 0);
        assert_eq!(f.counter.value().await, Some(4));
    }

    #[tokio::test]
    async fn storage_failure_aborts_before_counter() {
        let mut webhook = MockWebhookPort::new();
        webhook.expect_post_message().with(always(), always()).never();
        let counter = Arc::new(InMemoryStreakCounter::starting_at(4));
        let notifier = Arc::new(StreakNotifier::new(
            secrets(),
            Arc::new(webhook),
            NotifierConfig::new(SECRET),
        ));
        let service = DailyRunService::new(
            Arc::new(forecast_of(90.0, 0.0)),
            Arc::new(InMemoryWeatherHistory::failing()),
            Arc::clone(&counter) as Arc<dyn StreakCounterPort>,
            notifier,
        );

        let result = service.run(Some(date())).await;

        assert!(matches!(result, Err(ApplicationError::Storage(_))));
        assert_eq!(counter.value().await, Some(4));
    }

    #[tokio::test]
    async fn counter_failure_aborts_before_notify() {
        let mut webhook = MockWebhookPort::new();
        webhook.expect_post_message().never();

        let f = fixture(
            forecast_of(90.0, 0.0),
            InMemoryStreakCounter::failing(),
            secrets(),
            webhook,
        );

        let result = f.service.run(Some(date())).await;
        assert!(matches!(result, Err(ApplicationError::Storage(_))));
        assert_eq!(f.history.len().await, 1);
    }

    #[tokio::test]
    async fn custom_threshold_is_applied() {
        let threshold = HotDryThreshold::new(
            Fahrenheit::new(60.0).unwrap(),
            Inches::new(0.5).unwrap(),
        );
        let f = fixture(
            forecast_of(70.0, 0.2),
            InMemoryStreakCounter::starting_at(0),
            secrets(),
            webhook_expecting("It has been 1 hot days since it rained", 204),
        );
        let service = f.service.with_threshold(threshold);

        let report = service.run(Some(date())).await.unwrap();
        assert!(report.hot_and_dry);
    }
}
