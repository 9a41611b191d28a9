//! Resolved paths, flags and glyphs for one run

use anyhow::{anyhow, Result};
use crossterm::tty::IsTty;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::AppConfig;
use crate::constants::{
    JUPYTER_SUBDIR, OH_MY_ZSH_SUBDIR, SCRIPTS_SUBDIR, SHELL_SUBDIR, SYSTEM_SUBDIR, VIM_SUBDIR,
};
use crate::paths::expand_tilde;
use crate::ui::theme::Glyphs;

use super::release::Version;

/// Read-only settings built once at startup and passed to every workflow
#[derive(Debug, Clone)]
pub struct Environment {
    pub home: PathBuf,
    /// Root of the repository asset tree
    pub repo: PathBuf,
    pub scripts: PathBuf,
    pub shell: PathBuf,
    pub system: PathBuf,
    pub vim: PathBuf,
    pub jupyter: PathBuf,
    pub oh_my_zsh: PathBuf,
    /// Print actions instead of performing them
    pub dry_run: bool,
    pub glyphs: Glyphs,
    pub min_release: Version,
    pub download_timeout: Duration,
}

impl Environment {
    /// Resolve everything from the loaded configuration
    pub fn from_config(config: &AppConfig, dry_run: bool) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        let repo = PathBuf::from(expand_tilde(&config.paths.repo_root));
        let min_release: Version = config.requirements.min_release.parse()?;

        let mut env = Self::for_root(&home, &repo, dry_run);
        env.min_release = min_release;
        env.download_timeout = Duration::from_secs(config.network.download_timeout_secs);
        if !std::io::stdout().is_tty() {
            env.glyphs = Glyphs::plain();
        }
        Ok(env)
    }

    /// Environment rooted at explicit home and repository directories
    pub fn for_root(home: &Path, repo: &Path, dry_run: bool) -> Self {
        let defaults = AppConfig::default();
        Self {
            home: home.to_path_buf(),
            repo: repo.to_path_buf(),
            scripts: repo.join(SCRIPTS_SUBDIR),
            shell: repo.join(SHELL_SUBDIR),
            system: repo.join(SYSTEM_SUBDIR),
            vim: repo.join(VIM_SUBDIR),
            jupyter: repo.join(JUPYTER_SUBDIR),
            oh_my_zsh: home.join(OH_MY_ZSH_SUBDIR),
            dry_run,
            glyphs: Glyphs::default(),
            min_release: defaults
                .requirements
                .min_release
                .parse()
                .unwrap_or(Version::new(22, 4)),
            download_timeout: Duration::from_secs(defaults.network.download_timeout_secs),
        }
    }

    /// Path under the home directory
    pub fn home_path(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }
}

/// Login name of the invoking user
pub fn current_user() -> Option<String> {
    ["USER", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_root_layout() {
        let env = Environment::for_root(Path::new("/home/mid"), Path::new("/home/mid/.ubuntu"), false);
        assert_eq!(env.shell, PathBuf::from("/home/mid/.ubuntu/shell"));
        assert_eq!(env.vim, PathBuf::from("/home/mid/.ubuntu/vim"));
        assert_eq!(env.system, PathBuf::from("/home/mid/.ubuntu/system"));
        assert_eq!(env.oh_my_zsh, PathBuf::from("/home/mid/.oh-my-zsh"));
        assert_eq!(env.min_release, Version::new(22, 4));
        assert!(!env.dry_run);
    }

    #[test]
    fn test_from_config_uses_overrides() {
        let mut config = AppConfig::default();
        config.paths.repo_root = "/srv/ubuntu".to_string();
        config.requirements.min_release = "24.04".to_string();
        config.network.download_timeout_secs = 5;

        let env = Environment::from_config(&config, true).unwrap();
        assert_eq!(env.repo, PathBuf::from("/srv/ubuntu"));
        assert_eq!(env.scripts, PathBuf::from("/srv/ubuntu/scripts"));
        assert_eq!(env.min_release, Version::new(24, 4));
        assert_eq!(env.download_timeout, Duration::from_secs(5));
        assert!(env.dry_run);
    }

    #[test]
    fn test_from_config_rejects_bad_release() {
        let mut config = AppConfig::default();
        config.requirements.min_release = "jammy".to_string();
        assert!(Environment::from_config(&config, false).is_err());
    }

    #[test]
    fn test_home_path() {
        let env = Environment::for_root(Path::new("/home/mid"), Path::new("/r"), false);
        assert_eq!(env.home_path(".vimrc"), PathBuf::from("/home/mid/.vimrc"));
    }
}
