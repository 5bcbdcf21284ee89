//! Chat webhook port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Response of a webhook POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status code returned by the webhook
    pub status: u16,
}

impl WebhookResponse {
    /// Status the chat provider documents for an accepted message
    pub const ACCEPTED: u16 = 204;

    /// Whether the webhook accepted the message
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.status == Self::ACCEPTED
    }
}

/// Port for posting a text message to a chat webhook
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebhookPort: Send + Sync {
    /// POST `content` to the webhook at `url`
    ///
    /// Any HTTP response, successful or not, is returned as `Ok`. Only a
    /// failure to obtain a response is an error.
    async fn post_message(
        &self,
        url: &str,
        content: &str,
    ) -> Result<WebhookResponse, ApplicationError>;
}
