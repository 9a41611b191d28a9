//! Configuration file support
//!
//! Loads configuration from TOML file at ~/.config/vmsetup/config.toml
//! Falls back to defaults if the file doesn't exist or can't be parsed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::paths;

/// vmsetup configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Repository location
    pub paths: PathConfig,

    /// Host requirements checked before any step runs
    pub requirements: RequirementConfig,

    /// Log settings
    pub logging: LoggingConfig,

    /// Download settings
    pub network: NetworkConfig,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Root of the cloned ubuntu repository (asset tree)
    pub repo_root: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            repo_root: paths::default_repo_root(),
        }
    }
}

/// Requirement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementConfig {
    /// Minimum Ubuntu release as "major.minor"
    pub min_release: String,
}

impl Default for RequirementConfig {
    fn default() -> Self {
        Self {
            min_release: constants::DEFAULT_MIN_RELEASE.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for remote script downloads (seconds)
    pub download_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            download_timeout_secs: constants::DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (or the default location). A missing
    /// file gives defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = paths::config_file_path();
        let path = path.unwrap_or(&default_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Unwrap a `load` result, logging the failure and using defaults.
    /// Call once the log subscriber is installed.
    pub fn or_default(loaded: Result<Self>) -> Self {
        loaded.unwrap_or_else(|e| {
            tracing::warn!("{:#}, using defaults", e);
            Self::default()
        })
    }

    /// Generate example configuration content
    pub fn example_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
