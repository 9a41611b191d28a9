//! Host release detection and the minimum version gate

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::OS_RELEASE_FILE;

/// Release check failures
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Minimum required Ubuntu release is {required}, found {found}")]
    BelowMinimum { required: Version, found: Version },

    #[error("invalid release version: {0:?}")]
    Parse(String),

    #[error("no VERSION_ID in {0}")]
    Missing(String),

    #[error("failed to read release file: {0}")]
    Io(#[from] std::io::Error),
}

/// A major.minor release number ("22.04", "3.10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    /// Accepts "major" or "major.minor"; anything after the minor is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('"');
        let mut parts = trimmed.split('.');

        let major = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| ReleaseError::Parse(s.to_string()))?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| ReleaseError::Parse(s.to_string()))?,
            None => 0,
        };

        Ok(Self { major, minor })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Fail when `found` is older than `required`
pub fn check_minimum(required: Version, found: Version) -> Result<(), ReleaseError> {
    if found < required {
        return Err(ReleaseError::BelowMinimum { required, found });
    }
    Ok(())
}

/// Extract VERSION_ID from os-release content
pub fn parse_os_release(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("VERSION_ID=")
            .map(|v| v.trim().trim_matches('"'))
    })
}

/// Release of the running host
pub fn host_release() -> Result<Version, ReleaseError> {
    read_release(Path::new(OS_RELEASE_FILE))
}

fn read_release(path: &Path) -> Result<Version, ReleaseError> {
    let content = std::fs::read_to_string(path)?;
    let id = parse_os_release(&content)
        .ok_or_else(|| ReleaseError::Missing(path.display().to_string()))?;
    id.parse()
}

/// Gate run before any workflow step. An undetectable release is logged and
/// tolerated; a detected release below `required` is fatal.
pub fn ensure_supported(required: Version) -> Result<(), ReleaseError> {
    match host_release() {
        Ok(found) => {
            tracing::info!("Host release {} (minimum {})", found, required);
            check_minimum(required, found)
        }
        Err(e) => {
            tracing::warn!("Could not determine host release: {}", e);
            Ok(())
        }
    }
}
