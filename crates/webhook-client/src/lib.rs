//! # Webhook transport
//!
//! Defines the [`ChatTransport`] trait and the reqwest-backed [`WebhookClient`]. A send always
//! resolves to a [`Reply`]: network errors, non-2xx statuses and malformed bodies are logged and
//! replaced by the configured fallback text, so callers have a single resolution path.

use async_trait::async_trait;
use bestar_core::{Envelope, Reply};

mod config;
mod webhook;

pub use config::{EnvWebhookConfig, WebhookConfig, DEFAULT_FALLBACK_REPLY, DEFAULT_WEBHOOK_URL};
pub use webhook::{TransportError, WebhookClient};

/// Sends one envelope and returns the reply to append. Never fails.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, envelope: &Envelope) -> Reply;
}
