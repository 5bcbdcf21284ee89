//! In-memory port implementations shared by the service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyWeatherRecord, StreakCount};
use tokio::sync::{Mutex, RwLock};

use crate::error::ApplicationError;
use crate::ports::{SecretStorePort, StreakCounterPort, WeatherHistoryPort};

#[derive(Debug, Default)]
pub struct InMemoryStreakCounter {
    count: Mutex<Option<u64>>,
    fail: AtomicBool,
}

impl InMemoryStreakCounter {
    pub fn starting_at(count: u64) -> Self {
        Self {
            count: Mutex::new(Some(count)),
            fail: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        Self {
            count: Mutex::new(None),
            fail: AtomicBool::new(true),
        }
    }

    pub async fn value(&self) -> Option<u64> {
        *self.count.lock().await
    }

    fn check(&self) -> Result<(), ApplicationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApplicationError::Storage("counter table unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StreakCounterPort for InMemoryStreakCounter {
    async fn current(&self) -> Result<StreakCount, ApplicationError> {
        self.check()?;
        Ok(StreakCount::new(self.count.lock().await.unwrap_or(0)))
    }

    async fn increment(&self) -> Result<StreakCount, ApplicationError> {
        self.check()?;
        let mut guard = self.count.lock().await;
        let next = guard.unwrap_or(0) + 1;
        *guard = Some(next);
        Ok(StreakCount::new(next))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWeatherHistory {
    records: RwLock<HashMap<NaiveDate, DailyWeatherRecord>>,
    fail: bool,
}

impl InMemoryWeatherHistory {
    pub fn failing() -> Self {
        Self {
            records: RwLock::default(),
            fail: true,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl WeatherHistoryPort for InMemoryWeatherHistory {
    async fn record_day(&self, record: &DailyWeatherRecord) -> Result<(), ApplicationError> {
        if self.fail {
            return Err(ApplicationError::Storage("weather table unavailable".into()));
        }
        self.records.write().await.insert(record.date, *record);
        Ok(())
    }

    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyWeatherRecord>, ApplicationError> {
        Ok(self.records.read().await.get(&date).copied())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, String>,
    denied: bool,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            secrets: HashMap::new(),
            denied: true,
        }
    }

    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStorePort for InMemorySecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, ApplicationError> {
        if self.denied {
            return Err(ApplicationError::SecretAccess(format!("access denied: {name}")));
        }
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| ApplicationError::NotFound(format!("Secret not found: {name}")))
    }

    async fn get_json(&self, name: &str) -> Result<serde_json::Value, ApplicationError> {
        let value = self.get_secret(name).await?;
        serde_json::from_str(&value)
            .map_err(|e| ApplicationError::SecretAccess(format!("Secret '{name}' is not JSON: {e}")))
    }

    async fn exists(&self, name: &str) -> Result<bool, ApplicationError> {
        Ok(self.secrets.contains_key(name))
    }

    async fn is_healthy(&self) -> bool {
        !self.denied
    }
}
