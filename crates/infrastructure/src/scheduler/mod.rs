//! Cron-based task scheduler for `heatstreak daemon`
//!
//! Wraps `tokio-cron-scheduler`. Cron expressions have six fields
//! (`sec min hour day month weekday`) and are evaluated in UTC.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// Task not found
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A task with this name already exists
    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Parse a six-field cron expression
///
/// # Errors
///
/// Returns `SchedulerError::InvalidCronExpression` if it does not parse.
pub fn parse_cron(expression: &str) -> Result<cron::Schedule, SchedulerError> {
    cron::Schedule::from_str(expression)
        .map_err(|e| SchedulerError::InvalidCronExpression(format!("{expression}: {e}")))
}

/// Next firing time of a cron expression after `now`, in UTC
#[must_use]
pub fn next_run_after(expression: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    parse_cron(expression).ok()?.after(&now).next()
}

/// Statistics for a scheduled task
#[derive(Debug, Clone)]
pub struct TaskStats {
    pub name: String,
    pub cron_expression: String,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub next_run: Option<DateTime<Utc>>,
}

struct TaskMetadata {
    name: String,
    cron_expression: String,
    job_id: Uuid,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
}

impl TaskMetadata {
    #[allow(clippy::missing_const_for_fn)] // RwLock::new is not const in parking_lot
    fn new(name: String, cron_expression: String, job_id: Uuid) -> Self {
        Self {
            name,
            cron_expression,
            job_id,
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    fn to_stats(&self) -> TaskStats {
        TaskStats {
            name: self.name.clone(),
            cron_expression: self.cron_expression.clone(),
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            last_run: *self.last_run.read(),
            last_error: self.last_error.read().clone(),
            next_run: next_run_after(&self.cron_expression, Utc::now()),
        }
    }

    fn record_success(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
        *self.last_run.write() = Some(Utc::now());
    }

    fn record_failure(&self, error: String) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        *self.last_run.write() = Some(Utc::now());
        *self.last_error.write() = Some(error);
    }
}

type TaskTable = Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>;

/// Task scheduler for recurring background tasks
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: TaskTable,
    running: AtomicBool,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a stopped scheduler
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying job scheduler cannot be created.
    #[instrument]
    pub async fn new() -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: AtomicBool::new(false),
        })
    }

    /// Start firing scheduled tasks
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler fails to start.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already running");
            return Ok(());
        }

        self.scheduler.lock().await.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!(tasks = self.task_count(), "Task scheduler started");
        Ok(())
    }

    /// Stop the scheduler
    ///
    /// A stopped scheduler cannot be restarted.
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already stopped");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Task scheduler stopped");
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Add a named task
    ///
    /// The task's `Err` is logged and counted; it never stops the schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid, the name is taken, or
    /// the job cannot be registered.
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        parse_cron(cron_expression)?;
        if self.tasks.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let task_name = name.to_string();
        let tasks = Arc::clone(&self.tasks);

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let name = task_name.clone();
            let tasks = Arc::clone(&tasks);
            let task_future = task();

            Box::pin(async move {
                debug!(task = %name, "Starting scheduled task");
                let result = task_future.await;
                let metadata = tasks.read().get(&name).cloned();

                match result {
                    Ok(()) => {
                        if let Some(metadata) = metadata {
                            metadata.record_success();
                        }
                        info!(task = %name, "Task completed successfully");
                    },
                    Err(e) => {
                        error!(task = %name, error = %e, "Task failed");
                        if let Some(metadata) = metadata {
                            metadata.record_failure(e);
                        }
                    },
                }
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        let job_id = job.guid();
        self.scheduler.lock().await.add(job).await?;

        let metadata = Arc::new(TaskMetadata::new(
            name.to_string(),
            cron_expression.to_string(),
            job_id,
        ));
        self.tasks.write().insert(name.to_string(), metadata);

        info!(
            task = %name,
            cron = %cron_expression,
            next_run = ?next_run_after(cron_expression, Utc::now()),
            "Task scheduled"
        );
        Ok(())
    }

    /// Remove a scheduled task
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` for an unknown name.
    #[instrument(skip(self))]
    pub async fn remove_task(&self, name: &str) -> Result<(), SchedulerError> {
        let metadata = self
            .tasks
            .write()
            .remove(name)
            .ok_or_else(|| SchedulerError::TaskNotFound(name.to_string()))?;

        self.scheduler.lock().await.remove(&metadata.job_id).await?;
        info!(task = %name, "Task removed");
        Ok(())
    }

    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.tasks.read().get(name).map(|m| m.to_stats())
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }
}
