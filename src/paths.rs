//! Path resolution
//!
//! Centralized directory path resolution with consistent fallback strategies.

use std::path::PathBuf;

use crate::constants::REPO_HOME_SUBDIR;

// =============================================================================
// Path Constants (relative to home directory)
// =============================================================================

/// Data directory relative to home (logs)
const DATA_SUBDIR: &str = ".local/share/vmsetup";

/// Log filename prefix (rolled daily)
pub const LOG_FILE: &str = "vmsetup.log";

/// Configuration directory relative to home
const CONFIG_SUBDIR: &str = ".config/vmsetup";

/// Configuration filename
const CONFIG_FILE: &str = "config.toml";

// =============================================================================
// Fallback Paths
// =============================================================================

/// Fallback data directory when home is unavailable
const FALLBACK_DATA_DIR: &str = "/tmp/vmsetup";

/// Fallback configuration file when home is unavailable
const FALLBACK_CONFIG_FILE: &str = "/tmp/vmsetup.toml";

// =============================================================================
// Path Resolution Functions
// =============================================================================

/// Get the data directory path
/// Falls back to /tmp/vmsetup if home directory is unavailable
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DATA_SUBDIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Get the configuration file path
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(CONFIG_SUBDIR).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_FILE))
}

/// Default repository root (~/.ubuntu)
pub fn default_repo_root() -> String {
    format!("~/{}", REPO_HOME_SUBDIR)
}

/// Expand ~ in paths to home directory
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
