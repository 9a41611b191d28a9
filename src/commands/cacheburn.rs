//! Cache and junk file cleanup under ~/shares

use anyhow::Result;
use std::io::Write;

use super::labels::Labels;
use super::runner::Session;

const STEPS: &str = "
    Deleting __pycache__ directories
    Deleting .pytest_cache directories
    Deleting .ipynb_checkpoints directories
    Zapping pesky Icon files
    Crunching annoying desktop.ini files";

const CACHE_DIRS: &[&str] = &["__pycache__", ".pytest_cache", ".ipynb_checkpoints"];

/// `find` predicates for stray files: empty macOS Icon\r files and Windows
/// folder settings
const JUNK_FILES: &[&str] = &["Icon? -size 0", "desktop.ini"];

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let shares = session.env.home_path("shares");
    let mut labels = Labels::new(STEPS);
    session.console.line("")?;

    for dir in CACHE_DIRS {
        session.begin(&mut labels)?;
        let cmd = format!(
            "find {} -name {} -type d -exec rm -rvf {{}} ; -prune",
            shares.display(),
            dir
        );
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;
    }

    for file in JUNK_FILES {
        session.begin(&mut labels)?;
        let cmd = format!("find {} -name {} -type f -delete", shares.display(), file);
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;
    }

    session.console.line("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::executor::Executor;
    use crate::commands::testing::{checklist, dry_env, dry_session};
    use crate::system::environment::Environment;
    use crate::ui::{theme::Glyphs, Console};
    use std::fs;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dry_run_lists_five_steps() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session).await.unwrap();

        assert_eq!(checklist(session).len(), 5);
    }

    #[tokio::test]
    async fn test_removes_caches_and_junk() {
        let home = tempfile::tempdir().unwrap();
        let shares = home.path().join("shares");
        fs::create_dir_all(shares.join("lab1/__pycache__")).unwrap();
        fs::write(shares.join("lab1/__pycache__/mod.pyc"), "x").unwrap();
        fs::write(shares.join("lab1/desktop.ini"), "[.ShellClassInfo]").unwrap();
        fs::write(shares.join("lab1/main.py"), "print()").unwrap();

        let env = Environment::for_root(home.path(), home.path(), false);
        let exec = Executor::new(false, Duration::from_secs(5)).unwrap();
        let mut session = Session::with_console(&env, exec, Console::new(Vec::new(), Glyphs::plain()));

        run(&mut session).await.unwrap();

        assert!(!shares.join("lab1/__pycache__").exists());
        assert!(!shares.join("lab1/desktop.ini").exists());
        assert!(shares.join("lab1/main.py").exists());
    }
}
