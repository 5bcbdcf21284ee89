//! Streak notifier
//!
//! Resolves the webhook URL from the secret store and posts the current
//! streak to the chat channel.

use std::fmt;
use std::sync::Arc;

use domain::StreakCount;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{SecretStoreExt, SecretStorePort, WebhookPort};

/// Configuration for the streak notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Name of the secret holding `{"WEBHOOK_URL": "..."}`
    pub secret_name: String,
    /// Turn a non-204 response into an error
    pub delivery_failure_is_fatal: bool,
}

impl NotifierConfig {
    /// Create a config with the default non-fatal delivery policy
    #[must_use]
    pub fn new(secret_name: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            delivery_failure_is_fatal: false,
        }
    }

    /// Set the delivery policy
    #[must_use]
    pub const fn with_fatal_delivery(mut self, fatal: bool) -> Self {
        self.delivery_failure_is_fatal = fatal;
        self
    }
}

/// Outcome of posting the streak message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Webhook answered 204
    Accepted,
    /// Webhook answered with any other status
    Rejected { status: u16 },
}

impl DeliveryReport {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected { status } => write!(f, "rejected with status {status}"),
        }
    }
}

#[derive(Deserialize)]
struct WebhookSecret {
    #[serde(rename = "WEBHOOK_URL")]
    webhook_url: Option<String>,
}

/// Render the chat message for a streak
#[must_use]
pub fn format_message(count: StreakCount) -> String {
    format!("It has been {count} hot days since it rained")
}

/// Posts the current streak to the configured chat webhook
pub struct StreakNotifier {
    secrets: Arc<dyn SecretStorePort>,
    webhook: Arc<dyn WebhookPort>,
    config: NotifierConfig,
}

impl fmt::Debug for StreakNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreakNotifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StreakNotifier {
    #[must_use]
    pub fn new(
        secrets: Arc<dyn SecretStorePort>,
        webhook: Arc<dyn WebhookPort>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            secrets,
            webhook,
            config,
        }
    }

    /// Get the notifier configuration
    #[must_use]
    pub const fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Resolve and trim the webhook URL
    ///
    /// Any failure here is a `SecretAccess` error. The secret's value is
    /// never logged.
    pub async fn webhook_url(&self) -> Result<String, ApplicationError> {
        let name = &self.config.secret_name;
        let secret: WebhookSecret = self.secrets.get_typed(name).await.map_err(|e| match e {
            ApplicationError::SecretAccess(msg) => ApplicationError::SecretAccess(msg),
            other => ApplicationError::SecretAccess(format!("Cannot read secret '{name}': {other}")),
        })?;

        let url = secret.webhook_url.unwrap_or_default();
        let url = url.trim();
        if url.is_empty() {
            return Err(ApplicationError::SecretAccess(format!(
                "Secret '{name}' has no WEBHOOK_URL"
            )));
        }
        Ok(url.to_owned())
    }

    /// Send "It has been {count} hot days since it rained"
    ///
    /// Secret and transport failures propagate. A response other than 204
    /// is logged at `warn` and reported as [`DeliveryReport::Rejected`]
    /// unless the fatal policy is set. An accepted message logs nothing.
    #[instrument(skip(self), fields(count = %count))]
    pub async fn notify(&self, count: StreakCount) -> Result<DeliveryReport, ApplicationError> {
        let url = self.webhook_url().await?;
        let content = format_message(count);

        let response = self.webhook.post_message(&url, &content).await?;
        if response.is_accepted() {
            return Ok(DeliveryReport::Accepted);
        }

        warn!(status = response.status, "Webhook did not accept message");
        let report = DeliveryReport::Rejected {
            status: response.status,
        };
        if self.config.delivery_failure_is_fatal {
            return Err(ApplicationError::Transport(format!(
                "Webhook delivery {report}"
            )));
        }

        Ok(report)
    }
}
