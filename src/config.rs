// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// SNS topic ARN for trainer notifications.
    ///
    /// `None` means no outbound channel is configured; every notification
    /// path silently skips publishing (valid operating mode for local and
    /// test deployments).
    pub notifications_topic_arn: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            notifications_topic_arn: env::var("NOTIFICATIONS_TOPIC_ARN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            notifications_topic_arn: Some(
                "arn:aws:sns:us-west-2:000000000000:trainer-notifications-test".to_string(),
            ),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("PORT");
        env::remove_var("NOTIFICATIONS_TOPIC_ARN");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert!(config.notifications_topic_arn.is_none());
    }
}
