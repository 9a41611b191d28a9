//! pyenv installation

use anyhow::Result;
use std::io::Write;

use super::executor::ShellScript;
use super::files;
use super::labels::Labels;
use super::runner::Session;
use super::Outcome;
use crate::constants::PYENV_INSTALLER;

const STEPS: &str = "
    System initialization
    Updating package index
    Checking python build dependencies
    Installing pyenv and tools
    Adjusting shell environments";

/// Packages needed to compile CPython from source
const BUILD_DEPENDENCIES: &[&str] = &[
    "make",
    "build-essential",
    "libssl-dev",
    "zlib1g-dev",
    "libbz2-dev",
    "libreadline-dev",
    "libsqlite3-dev",
    "wget",
    "curl",
    "libncursesw5-dev",
    "xz-utils",
    "tk-dev",
    "libxml2-dev",
    "libxmlsec1-dev",
    "libffi-dev",
    "liblzma-dev",
];

const DONE: &str = "Setup script is complete. If all steps above are marked
    with green checkmarks, pyenv is ready to go. You must reboot your VM now
    for the changes to take effect. If any steps above show a red \"X\", there
    was an error during installation.";

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);
    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let outcome = session.exec.run_one_command("sudo apt update").await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_many_arguments(BUILD_DEPENDENCIES, |p| format!("sudo apt install {} -y", p))
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_shell_script(PYENV_INSTALLER, &ShellScript::default())
        .await;
    session.report(outcome)?;

    // zsh is the login shell, so its rc file decides whether support is present
    session.begin(&mut labels)?;
    let outcome = match files::append_once(
        &env.shell.join("pyenvsupport.txt"),
        &env.home_path(".zshrc"),
        &[env.home_path(".bashrc"), env.home_path(".zshrc")],
        env.dry_run,
    ) {
        Ok(_) => Outcome::Pass,
        Err(e) => {
            tracing::warn!("{:#}", e);
            Outcome::Fail
        }
    };
    session.report(outcome)?;

    session.finish(DONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_dry_run_leaves_rc_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.ends_with('\u{2714}')));
        assert!(!dir.path().join(".zshrc").exists());
        assert!(!dir.path().join(".bashrc").exists());
    }
}
