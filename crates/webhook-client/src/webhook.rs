//! reqwest implementation of [`ChatTransport`](crate::ChatTransport).

use crate::config::{WebhookConfig, DEFAULT_FALLBACK_REPLY};
use crate::ChatTransport;
use async_trait::async_trait;
use bestar_core::{Envelope, Reply};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why a webhook call produced no usable reply. Logged, never returned to callers of `send`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed reply: {0}")]
    Malformed(String),
}

/// Posts envelopes to the chat-automation webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    fallback_reply: String,
}

impl WebhookClient {
    /// Client with no timeout and the default fallback reply.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    pub fn from_config(config: &dyn WebhookConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            url: config.webhook_url().to_string(),
            fallback_reply: config.fallback_reply().to_string(),
        })
    }

    pub fn with_fallback_reply(mut self, fallback_reply: impl Into<String>) -> Self {
        self.fallback_reply = fallback_reply.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }

    /// One POST; status is checked before the body is parsed.
    pub async fn try_send(&self, envelope: &Envelope) -> Result<String, TransportError> {
        let resp = self
            .client
            .post(&self.url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        body.get("reply")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| TransportError::Malformed("missing string field `reply`".to_string()))
    }
}

#[async_trait]
impl ChatTransport for WebhookClient {
    #[instrument(
        skip(self, envelope),
        fields(
            session_id = %envelope.session_id,
            message_type = envelope.message_type.as_str()
        )
    )]
    async fn send(&self, envelope: &Envelope) -> Reply {
        match self.try_send(envelope).await {
            Ok(text) => {
                info!(reply_len = text.len(), "step: webhook replied");
                Reply::new(text)
            }
            Err(e) => {
                warn!(error = %e, "webhook failed, using fallback reply");
                Reply::new(self.fallback_reply.clone())
            }
        }
    }
}
