//! Backend configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub trait AdminApiConfig: Send + Sync {
    fn base_url(&self) -> &str;
    fn admin_email(&self) -> Option<&str>;
    fn admin_password(&self) -> Option<&str>;
}

/// Loaded from BESTAR_API_BASE_URL, BESTAR_ADMIN_EMAIL, BESTAR_ADMIN_PASSWORD.
#[derive(Debug, Clone)]
pub struct EnvAdminApiConfig {
    pub base_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for EnvAdminApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AdminApiConfig for EnvAdminApiConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }
    fn admin_email(&self) -> Option<&str> {
        self.admin_email.as_deref()
    }
    fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl EnvAdminApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: non_empty("BESTAR_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            admin_email: non_empty("BESTAR_ADMIN_EMAIL"),
            admin_password: non_empty("BESTAR_ADMIN_PASSWORD"),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.base_url).is_err() {
            anyhow::bail!(
                "BESTAR_API_BASE_URL is set but not a valid URL: {}",
                self.base_url
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("BESTAR_API_BASE_URL");
        env::remove_var("BESTAR_ADMIN_EMAIL");
        env::remove_var("BESTAR_ADMIN_PASSWORD");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = EnvAdminApiConfig::from_env().unwrap();
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
        assert!(config.admin_email().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        clear_env();
        env::set_var("BESTAR_API_BASE_URL", "https://api.bestar.example");
        env::set_var("BESTAR_ADMIN_EMAIL", "admin@bestar.example");
        env::set_var("BESTAR_ADMIN_PASSWORD", "secret");

        let config = EnvAdminApiConfig::from_env().unwrap();
        assert_eq!(config.base_url(), "https://api.bestar.example");
        assert_eq!(config.admin_email(), Some("admin@bestar.example"));
        assert_eq!(config.admin_password(), Some("secret"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_invalid_url() {
        clear_env();
        env::set_var("BESTAR_API_BASE_URL", "not a url");
        let config = EnvAdminApiConfig::from_env().unwrap();
        assert!(config.validate().is_err());
        clear_env();
    }
}
