//! System updates, optionally followed by pip upgrades and notebook sync

use anyhow::Result;
use std::io::Write;

use super::executor::RunOptions;
use super::labels::Labels;
use super::runner::Session;

const STEPS: &str = "
    Pulling updates to git repo
    Scanning for updates to jupyter
    Scanning for updates to jupyter lab
    Scanning for updates to pytest
    Synchronizing jupyter notebooks";

const UPDATES: &[&str] = &[
    "sudo apt -y update",
    "sudo apt -y upgrade",
    "sudo apt -y autoremove",
    "sudo snap refresh",
];

/// Upgraded only when already installed
const PIP_PACKAGES: &[&str] = &["jupyter", "jupyterlab", "pytest"];

const DONE: &str = "All updates and upgrades are complete. A reboot is
    recommended to ensure that the changes take effect.";

/// Run the package manager updates with their output on the terminal; with
/// `all`, also refresh the repository, pip tools and notebooks
pub async fn run<W: Write>(session: &mut Session<'_, W>, all: bool) -> Result<()> {
    let env = session.env;

    for cmd in UPDATES {
        if session.exec.run_with(cmd, RunOptions::inherit()).await.is_fail() {
            tracing::warn!("Update command failed: {}", cmd);
        }
    }

    if all {
        let mut labels = Labels::new(STEPS);
        session.console.paragraph("Performing additional updates")?;

        session.begin(&mut labels)?;
        let cmd = format!("git -C {} pull", env.repo.display());
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;

        for package in PIP_PACKAGES {
            let probe = format!("pip3 show {}", package);
            if session.exec.run_one_command(&probe).await.is_pass() {
                session.begin(&mut labels)?;
                let cmd = format!("pip3 install --upgrade {}", package);
                let outcome = session.exec.run_one_command(&cmd).await;
                session.report(outcome)?;
            } else {
                tracing::info!("{} not installed, skipping upgrade", package);
                labels.dump(1)?;
            }
        }

        session.begin(&mut labels)?;
        let notebooks_repo = env.home_path(".notebooksrepo");
        let outcome = session
            .exec
            .run_each(&[
                format!("git -C {} pull", notebooks_repo.display()),
                format!(
                    "rsync -rc --exclude .git* --exclude LICENSE* --exclude README* {}/ {} --delete",
                    notebooks_repo.display(),
                    env.home_path("notebooks").display()
                ),
            ])
            .await;
        session.report(outcome)?;
    }

    session.finish(DONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_updates_only_prints_no_checklist() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session, false).await.unwrap();

        assert!(checklist(session).is_empty());
    }

    #[tokio::test]
    async fn test_all_reports_every_step_in_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session, true).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Pulling updates to git repo...."));
        assert!(lines[4].starts_with("Synchronizing jupyter notebooks"));
    }
}
