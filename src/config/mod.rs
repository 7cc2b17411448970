//! # Configuration Management Module
//!
//! TOML-backed configuration for the CoBoard client: backend endpoint,
//! requester identity, and logging. Values load with serde defaults so a
//! minimal file works, and are validated before any request is made.
//!
//! ## Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://api.knppkp.me"
//! timeout_seconds = 10
//!
//! [identity]
//! user_id = "66012345"
//! status = "se"          # "se" or "a"
//!
//! [logging]
//! level = "info"
//! file = "coboard.log"
//! ```
//!
//! Precedence is CLI args > config file > defaults; the CLI only overrides
//! logging verbosity.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::forum::access::{Requester, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the CoBoard backend, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
}

fn default_timeout_seconds() -> u32 {
    10
}

/// The configured requester: which identity and user class every access and
/// visibility check evaluates against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// `sid` for SE users, `aid` for anonymous users.
    pub user_id: String,
    /// User class tag: `"se"` or `"a"`.
    pub status: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: Some("coboard.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Check the loaded values before they reach the client.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(anyhow!("api.base_url must not be empty"));
        }
        if self.api.base_url.ends_with('/') {
            return Err(anyhow!("api.base_url must not end with a slash"));
        }
        if self.api.timeout_seconds == 0 {
            return Err(anyhow!("api.timeout_seconds must be at least 1"));
        }
        Ok(())
    }

    /// The requester every decision is evaluated against.
    pub fn requester(&self) -> Requester {
        Requester::new(self.identity.user_id.clone(), self.identity.status)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: "https://api.knppkp.me".to_string(),
                timeout_seconds: default_timeout_seconds(),
            },
            identity: IdentityConfig {
                user_id: String::new(),
                status: Role::Se,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn minimal_file_parses_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8000"

            [identity]
            user_id = "66012345"
            status = "se"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.requester().role, Role::Se);
        assert_eq!(config.requester().id, "66012345");
    }

    #[test]
    fn anonymous_status_parses() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8000"

            [identity]
            user_id = "guest1"
            status = "a"
            "#,
        )
        .unwrap();
        assert_eq!(config.identity.status, Role::Anonymous);
    }

    #[test]
    fn trailing_slash_and_zero_timeout_rejected() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8000/".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn create_default_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.api.base_url, Config::default().api.base_url);
    }
}
