//! Webhook adapter - Implements WebhookPort using integration_webhook

use application::error::ApplicationError;
use application::ports::{WebhookPort, WebhookResponse};
use async_trait::async_trait;
use integration_webhook::{WebhookClient, WebhookClientConfig, WebhookError};
use tracing::instrument;

/// Adapter for Discord-style chat webhooks
#[derive(Debug, Clone)]
pub struct WebhookAdapter {
    client: WebhookClient,
}

impl WebhookAdapter {
    /// Create an adapter with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(timeout_secs: u64) -> Result<Self, ApplicationError> {
        let client = WebhookClient::new(WebhookClientConfig { timeout_secs })
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    fn map_error(err: WebhookError) -> ApplicationError {
        match err {
            WebhookError::Timeout | WebhookError::Request(_) => {
                ApplicationError::Transport(err.to_string())
            },
            WebhookError::InvalidUrl(_) => ApplicationError::SecretAccess(err.to_string()),
            WebhookError::Initialization(_) => ApplicationError::Internal(err.to_string()),
        }
    }
}

#[async_trait]
impl WebhookPort for WebhookAdapter {
    #[instrument(skip(self, url, content))]
    async fn post_message(
        &self,
        url: &str,
        content: &str,
    ) -> Result<WebhookResponse, ApplicationError> {
        let status = self
            .client
            .post_content(url, content)
            .await
            .map_err(Self::map_error)?;

        Ok(WebhookResponse {
            status: status.as_u16(),
        })
    }
}
