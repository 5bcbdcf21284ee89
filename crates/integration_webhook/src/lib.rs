//! Chat webhook integration
//!
//! Posts plain text messages to a Discord-style incoming webhook. The
//! webhook answers `204 No Content` when it accepts a message.

mod client;

pub use client::{WebhookClient, WebhookClientConfig, WebhookError, WebhookMessage};
