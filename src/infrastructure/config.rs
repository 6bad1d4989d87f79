use crate::domain::{config::GrabConfig, error::{TdsGrabError, TdsGrabResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::default_config_path(),
        }
    }

    /// Manager reading a fixed global configuration file
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load the global configuration, falling back to defaults when absent
    pub fn load_config(&self) -> TdsGrabResult<GrabConfig> {
        match &self.global_config_path {
            Some(path) if path.exists() => self.load_config_from_path(path),
            _ => Ok(GrabConfig::default()),
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> TdsGrabResult<GrabConfig> {
        let content = fs::read_to_string(path).map_err(|e| TdsGrabError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config = toml::from_str(&content).map_err(|e| TdsGrabError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("tdsgrab").join("config.toml"))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
