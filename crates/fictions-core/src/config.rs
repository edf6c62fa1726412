//! Client configuration model.

use crate::error::{FictionsError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// What to do when a protected call comes back 401.
///
/// The backend is the only judge of token validity. `Surface` keeps the session
/// and reports the error; `ClearSession` logs the user out first.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedPolicy {
    #[default]
    Surface,
    ClearSession,
}

impl FromStr for UnauthorizedPolicy {
    type Err = FictionsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "clear_session" | "clear-session" | "logout" => Ok(Self::ClearSession),
            other => Err(FictionsError::config(format!(
                "Unknown unauthorized policy '{}' (expected 'surface' or 'clear_session')",
                other
            ))),
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub on_unauthorized: UnauthorizedPolicy,
    /// `tracing` filter directive, e.g. "info" or "fictions_interaction=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            on_unauthorized: UnauthorizedPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Sets the base URL, dropping trailing slashes.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(FictionsError::config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(FictionsError::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.on_unauthorized, UnauthorizedPolicy::Surface);
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            base_url = "https://fictions.example.com"
            on_unauthorized = "clear_session"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://fictions.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.on_unauthorized, UnauthorizedPolicy::ClearSession);
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = ClientConfig::default().with_base_url("http://api.local/");
        assert_eq!(config.base_url, "http://api.local");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        let zero = ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "logout".parse::<UnauthorizedPolicy>().unwrap(),
            UnauthorizedPolicy::ClearSession
        );
        assert_eq!("Surface".parse::<UnauthorizedPolicy>().unwrap(), UnauthorizedPolicy::Surface);
        assert!("retry".parse::<UnauthorizedPolicy>().is_err());
    }
}
