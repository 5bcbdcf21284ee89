//! End-to-end tests of the daily run against mock HTTP services
//!
//! The forecast API and the chat webhook are served by wiremock; storage is
//! a temporary SQLite file and the webhook secret comes from a fixed set of
//! environment variables.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{StreakCounterPort, WeatherHistoryPort};
use application::{DailyRunService, DeliveryReport, NotifierConfig, StreakNotifier};
use chrono::NaiveDate;
use domain::StreakCount;
use infrastructure::adapters::{EnvSecretStore, ForecastAdapter, WebhookAdapter};
use infrastructure::config::{DatabaseConfig, StorageConfig};
use infrastructure::persistence::Persistence;
use integration_weather::WeatherConfig;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_NAME: &str = "heatstreak/webhook";

// ============================================================================
// Test Helpers
// ============================================================================

fn forecast_body(maxtemp_f: f64, totalprecip_in: f64) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Austin", "region": "Texas", "country": "USA" },
        "forecast": {
            "forecastday": [{
                "date": "2024-07-15",
                "day": {
                    "maxtemp_f": maxtemp_f,
                    "mintemp_f": 75.0,
                    "totalprecip_in": totalprecip_in,
                    "daily_chance_of_rain": 0,
                    "condition": { "text": "Sunny" }
                }
            }]
        }
    })
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
}

struct Harness {
    _dir: TempDir,
    persistence: Persistence,
    service: DailyRunService,
}

impl Harness {
    fn new(server: &MockServer, secrets: EnvSecretStore) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let persistence = Persistence::open(
            &DatabaseConfig {
                path: dir.path().join("heat.db").to_string_lossy().into_owned(),
                ..Default::default()
            },
            &StorageConfig {
                weather_table: "Weather".to_string(),
                counter_table: "Streak".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let forecast = ForecastAdapter::with_config(WeatherConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            location: "Austin".to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();

        let notifier = StreakNotifier::new(
            Arc::new(secrets),
            Arc::new(WebhookAdapter::new(5).unwrap()),
            NotifierConfig::new(SECRET_NAME),
        );

        let service = DailyRunService::new(
            Arc::new(forecast),
            Arc::new(persistence.history.clone()),
            Arc::new(persistence.counter.clone()),
            Arc::new(notifier),
        );

        Self {
            _dir: dir,
            persistence,
            service,
        }
    }

    fn with_hook(server: &MockServer) -> Self {
        let secret = serde_json::json!({ "WEBHOOK_URL": format!("{}/hook", server.uri()) });
        let secrets = EnvSecretStore::from_vars(HashMap::from([(
            "HEATSTREAK_WEBHOOK".to_string(),
            secret.to_string(),
        )]));
        Self::new(server, secrets)
    }

    async fn seed_counter(&self, value: u64) {
        for _ in 0..value {
            self.persistence.counter.increment().await.unwrap();
        }
    }

    fn stored_row(&self) -> (String, String) {
        let conn = self.persistence.pool.get().unwrap();
        conn.query_row(
            "SELECT High, Rainfall FROM Weather WHERE date = '07-15-2024'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap()
    }
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "Austin"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn expect_message(server: &MockServer, content: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(serde_json::json!({ "content": content })))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Daily run scenarios
// ============================================================================

#[tokio::test]
async fn hot_dry_day_extends_streak_and_posts() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(90.0, 0.0))).await;
    expect_message(&server, "It has been 5 hot days since it rained", 204, 1).await;

    let harness = Harness::with_hook(&server);
    harness.seed_counter(4).await;

    let report = harness.service.run(Some(run_date())).await.unwrap();

    assert!(report.hot_and_dry);
    assert_eq!(report.streak, StreakCount::new(5));
    assert_eq!(report.delivery, DeliveryReport::Accepted);
    assert_eq!(harness.stored_row(), ("90.00".to_string(), "0.00".to_string()));
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(5)
    );
}

#[tokio::test]
async fn wet_day_keeps_streak_and_still_posts() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(70.0, 1.2))).await;
    expect_message(&server, "It has been 5 hot days since it rained", 204, 1).await;

    let harness = Harness::with_hook(&server);
    harness.seed_counter(5).await;

    let report = harness.service.run(Some(run_date())).await.unwrap();

    assert!(!report.hot_and_dry);
    assert_eq!(report.streak, StreakCount::new(5));
    assert_eq!(harness.stored_row(), ("70.00".to_string(), "1.20".to_string()));
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(5)
    );
}

#[tokio::test]
async fn rerun_on_same_day_overwrites_record() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(90.0, 0.0))).await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let harness = Harness::with_hook(&server);
    harness.service.run(Some(run_date())).await.unwrap();
    harness.service.run(Some(run_date())).await.unwrap();

    let record = harness
        .persistence
        .history
        .find_by_date(run_date())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.high_attribute(), "90.00");
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(2)
    );
}

#[tokio::test]
async fn rejected_webhook_is_not_an_error() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(90.0, 0.0))).await;
    expect_message(&server, "It has been 1 hot days since it rained", 500, 1).await;

    let harness = Harness::with_hook(&server);
    let report = harness.service.run(Some(run_date())).await.unwrap();

    assert_eq!(report.delivery, DeliveryReport::Rejected { status: 500 });
    assert_eq!(report.streak, StreakCount::new(1));
}

#[tokio::test]
async fn missing_secret_aborts_after_counter_step() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(90.0, 0.0))).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let harness = Harness::new(&server, EnvSecretStore::from_vars(HashMap::new()));
    harness.seed_counter(4).await;

    let result = harness.service.run(Some(run_date())).await;

    assert!(matches!(result, Err(ApplicationError::SecretAccess(_))));
    assert_eq!(harness.stored_row(), ("90.00".to_string(), "0.00".to_string()));
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(5)
    );
}

#[tokio::test]
async fn unreachable_webhook_fails_the_run_after_counting() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_body(90.0, 0.0))).await;

    let secrets = EnvSecretStore::from_vars(HashMap::from([(
        "HEATSTREAK_WEBHOOK".to_string(),
        r#"{"WEBHOOK_URL": "http://127.0.0.1:1/hook"}"#.to_string(),
    )]));
    let harness = Harness::new(&server, secrets);
    harness.seed_counter(4).await;

    let result = harness.service.run(Some(run_date())).await;

    assert!(matches!(result, Err(ApplicationError::Transport(_))), "{result:?}");
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(5)
    );
}

#[tokio::test]
async fn forecast_outage_aborts_before_storage() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(503).set_body_string("down")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let harness = Harness::with_hook(&server);
    let result = harness.service.run(Some(run_date())).await;

    assert!(matches!(result, Err(ApplicationError::Transport(_))));
    assert!(
        harness
            .persistence
            .history
            .find_by_date(run_date())
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        harness.persistence.counter.current().await.unwrap(),
        StreakCount::new(0)
    );
}

#[tokio::test]
async fn malformed_forecast_is_format_error() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "forecast": {} })),
    )
    .await;

    let harness = Harness::with_hook(&server);
    let result = harness.service.run(Some(run_date())).await;

    assert!(matches!(result, Err(ApplicationError::Format(_))));
}
