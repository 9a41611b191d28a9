//! Python tooling for course notebooks

use anyhow::Result;
use std::io::Write;

use super::files::CopyTarget;
use super::labels::Labels;
use super::runner::Session;

const STEPS: &str = "
    System initialization
    Creating new directories
    Copying files
    Installing jupyter
    Installing jupyter lab
    Installing pytest";

const PACKAGES: &[&str] = &["jupyter", "jupyterlab", "pytest"];

const SETTINGS_DIR: &str = ".jupyter/lab/user-settings/@jupyterlab/notebook-extension";

const DONE: &str = "Python tools installation complete. Install additional tools
    or reboot your VM now for the changes to take effect.";

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let settings = env.home_path(SETTINGS_DIR);
    let outcome = session.make_dirs(&[settings.clone()]);
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.copy_files(&[CopyTarget::new(
        env.jupyter.join("tracker.jupyterlab-settings"),
        settings,
    )]);
    session.report(outcome)?;

    for package in PACKAGES {
        session.begin(&mut labels)?;
        let cmd = format!("pip3 install --upgrade {}", package);
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;
    }

    session.finish(DONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 6);
        assert!(lines[3].starts_with("Installing jupyter...."));
        assert!(!dir.path().join(".jupyter").exists());
    }
}
