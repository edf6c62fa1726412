//! Unified path management for fictions client files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fictions/          # Config directory (platform config dir + "fictions")
//! ├── config.toml              # Client configuration
//! └── session.json             # Bearer token and cached user profile (mode 600 on Unix)
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "fictions";
const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for fictions_core::FictionsError {
    fn from(e: PathError) -> Self {
        fictions_core::FictionsError::config(e.to_string())
    }
}

/// Path resolver for the fictions client.
///
/// With a base directory every file lives directly under it (tests, `--config-dir`);
/// otherwise the platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct FictionsPaths {
    base_dir: Option<PathBuf>,
}

impl FictionsPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the fictions configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/fictions/`
    /// - `Err(PathError::ConfigDirNotFound)`: No base dir given and the platform has none
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the path to session.json.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(SESSION_FILE_NAME))
    }
}
