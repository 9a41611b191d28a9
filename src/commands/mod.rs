//! Command execution and provisioning workflows

pub mod cacheburn;
pub mod certs;
pub mod desktop;
pub mod docker;
pub mod errors;
pub mod executor;
pub mod files;
pub mod github_desktop;
pub mod labels;
pub mod multipass;
pub mod pyenv;
pub mod pytools;
pub mod runner;
pub mod server;
pub mod shell;
pub mod tuneup;
pub mod vim;

/// Two-valued result of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }

    pub fn is_fail(self) -> bool {
        self == Outcome::Fail
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

/// Credentials for the account-creation workflows
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user: String,
    pub passwd: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Pass);
        assert_eq!(Outcome::from(false), Outcome::Fail);
        assert!(Outcome::Pass.is_pass());
        assert!(Outcome::Fail.is_fail());
    }
}
