//! Webhook configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;
use std::time::Duration;

/// Chat-automation endpoint the widget posts to.
pub const DEFAULT_WEBHOOK_URL: &str = "https://n8n.growhubeg.com/webhook/be-star-webchat";

/// Reply substituted whenever the webhook cannot produce one.
pub const DEFAULT_FALLBACK_REPLY: &str = "عذراً، حدث خطأ. حاول مرة أخرى.";

/// Webhook transport configuration.
pub trait WebhookConfig: Send + Sync {
    fn webhook_url(&self) -> &str;
    /// Client-side timeout; `None` leaves requests unbounded.
    fn timeout(&self) -> Option<Duration>;
    fn fallback_reply(&self) -> &str;
}

/// Webhook config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvWebhookConfig {
    pub webhook_url: String,
    pub timeout_secs: Option<u64>,
    pub fallback_reply: String,
}

impl Default for EnvWebhookConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            timeout_secs: None,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

impl WebhookConfig for EnvWebhookConfig {
    fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
    fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }
}

impl EnvWebhookConfig {
    /// Load from BESTAR_WEBHOOK_URL, BESTAR_WEBHOOK_TIMEOUT_SECS, BESTAR_FALLBACK_REPLY.
    pub fn from_env() -> Result<Self> {
        let webhook_url = env::var("BESTAR_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());
        let timeout_secs = env::var("BESTAR_WEBHOOK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &u64| *secs > 0);
        let fallback_reply = env::var("BESTAR_FALLBACK_REPLY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_REPLY.to_string());
        Ok(Self {
            webhook_url,
            timeout_secs,
            fallback_reply,
        })
    }

    /// Webhook URL must parse as an absolute URL.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.webhook_url).is_err() {
            anyhow::bail!(
                "BESTAR_WEBHOOK_URL is set but not a valid URL: {}",
                self.webhook_url
            );
        }
        Ok(())
    }
}
