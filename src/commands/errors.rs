//! Command error parsing and categorization
//!
//! Parses stderr output from failed commands into a one-line reason for the
//! log. The console only ever shows the failure glyph.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Reasons a command line never reached a child process
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command line")]
    Empty,

    #[error("unbalanced quoting in command: {0}")]
    Quoting(String),
}

/// Parsed error with user-friendly information
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedError {
    /// Short summary (one line)
    pub summary: String,
    /// Longer description if available
    pub detail: Option<String>,
    /// User-friendly suggestion
    pub suggestion: String,
}

/// Context about what operation was running
pub struct ErrorContext {
    pub operation: String,
}

impl ParsedError {
    /// Parse stderr output into a categorized error
    pub fn from_stderr(stderr: &str, context: ErrorContext) -> Self {
        // Try each parser in order of specificity
        if let Some(err) = parse_apt_error(stderr) {
            return err;
        }
        if let Some(err) = parse_network_error(stderr) {
            return err;
        }
        if let Some(err) = parse_git_error(stderr) {
            return err;
        }
        if let Some(err) = parse_permission_error(stderr) {
            return err;
        }

        Self::generic(stderr, context)
    }

    fn generic(stderr: &str, context: ErrorContext) -> Self {
        let first_error = stderr
            .lines()
            .find(|line| line.to_lowercase().contains("error"))
            .or_else(|| stderr.lines().find(|line| !line.trim().is_empty()))
            .unwrap_or("");

        let detail = first_error
            .trim()
            .trim_start_matches("E:")
            .trim_start_matches("error:")
            .trim()
            .to_string();

        Self {
            summary: format!("{} failed", context.operation),
            detail: if detail.is_empty() { None } else { Some(detail) },
            suggestion: "Check the command output for details.".to_string(),
        }
    }
}

impl std::fmt::Display for ParsedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        write!(f, " - {}", self.suggestion)
    }
}

// apt/dpkg error patterns
static APT_LOCATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Unable to locate package (\S+)").expect("apt regex pattern is statically validated")
});

fn parse_apt_error(stderr: &str) -> Option<ParsedError> {
    if stderr.contains("Could not get lock") || stderr.contains("dpkg frontend lock") {
        return Some(ParsedError {
            summary: "Package manager is locked".to_string(),
            detail: None,
            suggestion: "Another apt process is running (often unattended-upgrades). Wait and re-run."
                .to_string(),
        });
    }
    if let Some(caps) = APT_LOCATE_RE.captures(stderr) {
        return Some(ParsedError {
            summary: "Package not found".to_string(),
            detail: caps.get(1).map(|m| format!("Package: {}", m.as_str())),
            suggestion: "Run 'sudo apt update' and check the package name for this release."
                .to_string(),
        });
    }
    None
}

fn parse_network_error(stderr: &str) -> Option<ParsedError> {
    let patterns = [
        (
            "Could not resolve host",
            "DNS resolution failed",
            "Check your internet connection. Try: ping github.com",
        ),
        (
            "Temporary failure resolving",
            "DNS resolution failed",
            "Check your internet connection and DNS settings.",
        ),
        (
            "Connection refused",
            "Connection refused",
            "The remote server refused the connection. Check if it's online.",
        ),
        (
            "Connection timed out",
            "Connection timed out",
            "Network request timed out. Check your connection and try again.",
        ),
        (
            "Network is unreachable",
            "Network unreachable",
            "No network connectivity. Check your internet connection.",
        ),
        (
            "certificate verify failed",
            "TLS certificate rejected",
            "The network may intercept TLS. Install the site certificates first.",
        ),
    ];

    let stderr_lower = stderr.to_lowercase();
    for (pattern, summary, suggestion) in patterns {
        if stderr_lower.contains(&pattern.to_lowercase()) {
            return Some(ParsedError {
                summary: summary.to_string(),
                detail: None,
                suggestion: suggestion.to_string(),
            });
        }
    }
    None
}

fn parse_git_error(stderr: &str) -> Option<ParsedError> {
    let stderr_lower = stderr.to_lowercase();

    let patterns = [
        (
            "already exists and is not an empty directory",
            "Clone target already exists",
            "The repository was cloned by an earlier run. Remove it to clone again.",
        ),
        (
            "fatal: not a git repository",
            "Not a git repository",
            "Check that the repository was cloned to the expected location.",
        ),
        (
            "could not read from remote",
            "Git remote access failed",
            "Check your network connection.",
        ),
        (
            "your local changes would be overwritten",
            "Uncommitted local changes",
            "Commit or stash your changes first: git stash",
        ),
    ];

    for (pattern, summary, suggestion) in patterns {
        if stderr_lower.contains(pattern) {
            return Some(ParsedError {
                summary: summary.to_string(),
                detail: None,
                suggestion: suggestion.to_string(),
            });
        }
    }
    None
}

// Permission error pattern
static PERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)permission denied[:\s]*([^\n]*)")
        .expect("permission regex pattern is statically validated")
});

fn parse_permission_error(stderr: &str) -> Option<ParsedError> {
    if let Some(caps) = PERM_RE.captures(stderr) {
        let path = caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());

        return Some(ParsedError {
            summary: "Permission denied".to_string(),
            detail: path,
            suggestion: "Check that your account has sudo privileges.".to_string(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ErrorContext {
        ErrorContext {
            operation: "apt".to_string(),
        }
    }

    #[test]
    fn test_apt_lock() {
        let err = ParsedError::from_stderr(
            "E: Could not get lock /var/lib/dpkg/lock-frontend. It is held by process 1234",
            ctx(),
        );
        assert_eq!(err.summary, "Package manager is locked");
    }

    #[test]
    fn test_apt_missing_package() {
        let err = ParsedError::from_stderr("E: Unable to locate package nala", ctx());
        assert_eq!(err.summary, "Package not found");
        assert_eq!(err.detail.as_deref(), Some("Package: nala"));
    }

    #[test]
    fn test_network_error() {
        let err = ParsedError::from_stderr("curl: (6) Could not resolve host: example.com", ctx());
        assert_eq!(err.summary, "DNS resolution failed");
    }

    #[test]
    fn test_git_clone_exists() {
        let err = ParsedError::from_stderr(
            "fatal: destination path '/home/u/.compose' already exists and is not an empty directory.",
            ctx(),
        );
        assert_eq!(err.summary, "Clone target already exists");
    }

    #[test]
    fn test_permission_error() {
        let err = ParsedError::from_stderr("cp: cannot open '/etc/x': Permission denied", ctx());
        assert_eq!(err.summary, "Permission denied");
    }

    #[test]
    fn test_generic_error() {
        let err = ParsedError::from_stderr("something odd\n", ctx());
        assert_eq!(err.summary, "apt failed");
        assert_eq!(err.detail.as_deref(), Some("something odd"));
    }

    #[test]
    fn test_generic_error_empty_stderr() {
        let err = ParsedError::from_stderr("", ctx());
        assert!(err.detail.is_none());
        assert!(err.to_string().starts_with("apt failed - "));
    }
}
