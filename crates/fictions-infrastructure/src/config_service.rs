//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` and layers environment variables on top.

use crate::paths::FictionsPaths;
use fictions_core::config::ClientConfig;
use fictions_core::{FictionsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "FICTIONS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "FICTIONS_TIMEOUT_SECS";
pub const ENV_ON_UNAUTHORIZED: &str = "FICTIONS_ON_UNAUTHORIZED";
pub const ENV_LOG: &str = "FICTIONS_LOG";

/// Configuration service for the client.
///
/// Priority: environment variables > config.toml > built-in defaults.
/// A missing config.toml is created with the defaults on first load.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(paths: &FictionsPaths) -> Result<Self> {
        Ok(Self {
            path: paths.config_file()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the effective configuration using the process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads config.toml only, creating it with defaults when missing.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            let config = ClientConfig::default();
            self.save(&config)?;
            tracing::info!("Created default config at {}", self.path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Overrides fields of `config` with values found through `lookup`.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config = config.with_base_url(url.trim());
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.timeout_secs = raw.trim().parse().map_err(|_| {
            FictionsError::config(format!("{ENV_TIMEOUT_SECS} must be a number (got '{raw}')"))
        })?;
    }
    if let Some(raw) = lookup(ENV_ON_UNAUTHORIZED) {
        config.on_unauthorized = raw.parse()?;
    }
    if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.log_level = level;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fictions_core::config::UnauthorizedPolicy;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(&FictionsPaths::new(Some(dir.path()))).unwrap()
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(service.path().exists());
    }

    #[test]
    fn test_file_values_are_used() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::write(
            service.path(),
            "base_url = \"https://api.example.com\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = service.load_file().unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::write(service.path(), "base_url = [").unwrap();

        assert!(matches!(
            service.load_file(),
            Err(FictionsError::Serialization { .. })
        ));
    }

    #[test]
    fn test_env_overrides_take_priority() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://127.0.0.1:9000/"),
            (ENV_TIMEOUT_SECS, "7"),
            (ENV_ON_UNAUTHORIZED, "clear_session"),
            (ENV_LOG, "debug"),
        ]);
        let config =
            apply_env_overrides(ClientConfig::default(), |k| env.get(k).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.on_unauthorized, UnauthorizedPolicy::ClearSession);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let result = apply_env_overrides(ClientConfig::default(), |k| {
            (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(FictionsError::Config(_))));
    }
}
