//! Aggregated CLI configuration.

use admin_api::EnvAdminApiConfig;
use anyhow::{Context, Result};
use std::env;
use webhook_client::EnvWebhookConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/bestar.log";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub webhook: EnvWebhookConfig,
    pub admin: EnvAdminApiConfig,
    pub log_file: String,
}

impl CliConfig {
    /// Load every section from env (call `dotenvy::dotenv()` first) and validate.
    pub fn load() -> Result<Self> {
        let webhook = EnvWebhookConfig::from_env().context("Load webhook config")?;
        webhook.validate()?;
        let admin = EnvAdminApiConfig::from_env().context("Load admin API config")?;
        admin.validate()?;
        let log_file = env::var("LOG_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        Ok(Self {
            webhook,
            admin,
            log_file,
        })
    }

    /// Admin credentials, flags first.
    pub fn admin_credentials(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<(String, String)> {
        let email = email
            .or_else(|| self.admin.admin_email.clone())
            .context("BESTAR_ADMIN_EMAIL not set (or pass --email)")?;
        let password = password
            .or_else(|| self.admin.admin_password.clone())
            .context("BESTAR_ADMIN_PASSWORD not set (or pass --password)")?;
        Ok((email, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "BESTAR_WEBHOOK_URL",
        "BESTAR_API_BASE_URL",
        "BESTAR_ADMIN_EMAIL",
        "BESTAR_ADMIN_PASSWORD",
        "LOG_FILE",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        let config = CliConfig::load().unwrap();
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert!(config.admin_credentials(None, None).is_err());
        let (email, password) = config
            .admin_credentials(Some("a@b.c".to_string()), Some("pw".to_string()))
            .unwrap();
        assert_eq!((email.as_str(), password.as_str()), ("a@b.c", "pw"));
    }

    #[test]
    #[serial]
    fn test_load_rejects_bad_webhook_url() {
        clear_env();
        env::set_var("BESTAR_WEBHOOK_URL", "not a url");
        assert!(CliConfig::load().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_flags_override_env_credentials() {
        clear_env();
        env::set_var("BESTAR_ADMIN_EMAIL", "env@bestar.example");
        env::set_var("BESTAR_ADMIN_PASSWORD", "env-pw");
        env::set_var("LOG_FILE", "/tmp/bestar-test.log");
        let config = CliConfig::load().unwrap();
        assert_eq!(config.log_file, "/tmp/bestar-test.log");
        let (email, password) = config
            .admin_credentials(Some("flag@bestar.example".to_string()), None)
            .unwrap();
        assert_eq!(email, "flag@bestar.example");
        assert_eq!(password, "env-pw");
        clear_env();
    }
}
