//! Session shared by every workflow
//!
//! Provides a unified way to:
//! - Print labels and their outcome glyphs
//! - Run commands, copies and directory creation in dry-run aware form
//! - Force the sudo prompt before the checklist starts

use anyhow::Result;
use std::io::{Stdout, Write};
use std::path::PathBuf;

use super::executor::Executor;
use super::files::{self, CopyTarget};
use super::labels::Labels;
use super::Outcome;
use crate::system::environment::Environment;
use crate::ui::{self, Console};

/// Environment, executor and console for one workflow run
pub struct Session<'a, W: Write = Stdout> {
    pub env: &'a Environment,
    pub exec: Executor,
    pub console: Console<W>,
    current: Option<String>,
}

impl<'a> Session<'a, Stdout> {
    /// Session printing to stdout
    pub fn new(env: &'a Environment) -> Result<Self> {
        let exec = Executor::new(env.dry_run, env.download_timeout)?;
        Ok(Self::with_console(env, exec, Console::stdout(env.glyphs.clone())))
    }
}

impl<'a, W: Write> Session<'a, W> {
    pub fn with_console(env: &'a Environment, exec: Executor, console: Console<W>) -> Self {
        Self {
            env,
            exec,
            console,
            current: None,
        }
    }

    /// Clear the screen before the checklist
    pub fn clear(&self) {
        ui::clear_screen();
    }

    /// Print the next label
    pub fn begin(&mut self, labels: &mut Labels) -> Result<()> {
        self.current = labels.peek().map(str::to_string);
        self.console.label(labels)
    }

    /// Print the outcome of the current step
    pub fn report(&mut self, outcome: Outcome) -> Result<()> {
        let step = self.current.take().unwrap_or_default();
        match outcome {
            Outcome::Pass => tracing::info!("Step passed: {}", step),
            Outcome::Fail => tracing::warn!("Step failed: {}", step),
        }
        self.console.outcome(outcome)
    }

    /// Report a step with no work of its own
    pub fn pass(&mut self) -> Result<()> {
        self.report(Outcome::Pass)
    }

    /// Run a throwaway sudo command so the password prompt appears before
    /// the first label
    pub async fn acquire_sudo(&mut self) -> Result<()> {
        self.acquire_sudo_with("Please enter your password if prompted.")
            .await
    }

    /// Same as `acquire_sudo` with a custom prompt paragraph
    pub async fn acquire_sudo_with(&mut self, message: &str) -> Result<()> {
        self.console.paragraph(message)?;
        self.prime_credentials("sudo ls").await;
        Ok(())
    }

    /// Run the throwaway command; a failure is logged but not reported as a
    /// step, since no label is active yet
    async fn prime_credentials(&mut self, cmd: &str) {
        if self.exec.run_one_command(cmd).await.is_fail() {
            tracing::warn!("Could not acquire sudo credentials ({}), privileged steps may fail", cmd);
        }
    }

    /// Create directories; an error becomes a failed step
    pub fn make_dirs(&self, dirs: &[PathBuf]) -> Outcome {
        match files::make_dirs(dirs, self.env.dry_run) {
            Ok(()) => Outcome::Pass,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Outcome::Fail
            }
        }
    }

    /// Copy files; an error becomes a failed step
    pub fn copy_files(&self, targets: &[CopyTarget]) -> Outcome {
        match files::copy_files(targets, self.env.dry_run) {
            Ok(()) => Outcome::Pass,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Outcome::Fail
            }
        }
    }

    /// Print the closing paragraph
    pub fn finish(&mut self, message: &str) -> Result<()> {
        self.console.paragraph(message)
    }
}
