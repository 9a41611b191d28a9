//! Command execution reduced to a pass/fail outcome
//!
//! Commands are given as single strings and split with shell quoting rules;
//! nothing is interpolated or globbed. Every call blocks the workflow until
//! the child exits.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::errors::{ErrorContext, ExecError, ParsedError};
use super::Outcome;
use crate::constants::USER_AGENT;

/// Output kept from the most recent command
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

#[derive(Debug)]
enum Input {
    Inherit,
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Stream wiring for a single command
#[derive(Debug)]
pub struct RunOptions {
    capture: bool,
    input: Input,
    output: Option<PathBuf>,
    dir: Option<PathBuf>,
    sensitive: bool,
}

impl Default for RunOptions {
    /// Output captured (hidden), stdin inherited
    fn default() -> Self {
        Self {
            capture: true,
            input: Input::Inherit,
            output: None,
            dir: None,
            sensitive: false,
        }
    }
}

impl RunOptions {
    /// Let the child write straight to the terminal
    pub fn inherit() -> Self {
        Self {
            capture: false,
            ..Self::default()
        }
    }

    /// Feed a file to the child's stdin
    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Input::File(path.into());
        self
    }

    /// Feed a buffer to the child's stdin
    pub fn stdin_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.input = Input::Bytes(bytes);
        self
    }

    /// Write the child's stdout to a file (created or truncated)
    pub fn stdout_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Run the child in `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Keep arguments and output out of logs and dry-run echoes; only the
    /// program name is recorded
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Remote script invocation settings
#[derive(Debug, Clone)]
pub struct ShellScript<'a> {
    /// Interpreter the script is handed to
    pub shell: &'a str,
    /// Prefix the interpreter with sudo
    pub as_sudo: bool,
    /// Extra arguments, split with shell quoting rules
    pub options: &'a str,
}

impl Default for ShellScript<'_> {
    fn default() -> Self {
        Self {
            shell: "bash",
            as_sudo: false,
            options: "",
        }
    }
}

/// Runs commands and remembers the last captured output
pub struct Executor {
    dry_run: bool,
    last: Option<CapturedOutput>,
    client: reqwest::Client,
}

impl Executor {
    /// Create an executor; `dry_run` prints commands instead of running them
    pub fn new(dry_run: bool, download_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(download_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            dry_run,
            last: None,
            client,
        })
    }

    /// Run one command with captured output
    pub async fn run_one_command(&mut self, cmd: &str) -> Outcome {
        self.run_with(cmd, RunOptions::default()).await
    }

    /// Run one command with explicit stream wiring
    pub async fn run_with(&mut self, cmd: &str, options: RunOptions) -> Outcome {
        if self.dry_run {
            if options.sensitive {
                println!("\nRunning: {}", redacted(cmd));
            } else {
                println!("\nRunning: {}", cmd);
            }
            return Outcome::Pass;
        }

        match split_command(cmd) {
            Ok(argv) => self.run_argv(argv, options).await,
            Err(_) if options.sensitive => {
                tracing::warn!("Rejected command line: {}", redacted(cmd));
                self.last = None;
                Outcome::Fail
            }
            Err(e) => {
                tracing::warn!("Rejected command line: {}", e);
                self.last = None;
                Outcome::Fail
            }
        }
    }

    /// Run the command built for each target, stopping at the first failure
    pub async fn run_many_arguments<F>(&mut self, targets: &[&str], build: F) -> Outcome
    where
        F: Fn(&str) -> String,
    {
        for target in targets {
            if self.run_one_command(&build(target)).await.is_fail() {
                return Outcome::Fail;
            }
        }
        Outcome::Pass
    }

    /// Run commands in order, stopping at the first failure
    pub async fn run_each<S: AsRef<str>>(&mut self, commands: &[S]) -> Outcome {
        for cmd in commands {
            if self.run_one_command(cmd.as_ref()).await.is_fail() {
                return Outcome::Fail;
            }
        }
        Outcome::Pass
    }

    /// Run `upstream`, then feed its stdout to `downstream`.
    /// An upstream failure aborts the pipeline.
    pub async fn pipe(&mut self, upstream: &str, downstream: &str) -> Outcome {
        if self.dry_run {
            println!("\nRunning: {} | {}", upstream, downstream);
            return Outcome::Pass;
        }

        if self.run_one_command(upstream).await.is_fail() {
            tracing::warn!("Pipeline aborted, upstream failed: {}", upstream);
            return Outcome::Fail;
        }
        let buffer = self
            .last
            .as_ref()
            .map(|o| o.stdout.clone())
            .unwrap_or_default();

        self.run_with(downstream, RunOptions::default().stdin_bytes(buffer))
            .await
    }

    /// Download the script at `url` into a temporary file and run it
    pub async fn run_shell_script(&mut self, url: &str, script: &ShellScript<'_>) -> Outcome {
        if self.dry_run {
            let sudo = if script.as_sudo { "sudo " } else { "" };
            println!("\nRunning: {}{} <{}> {}", sudo, script.shell, url, script.options);
            return Outcome::Pass;
        }

        let file = match self.download(url).await {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Script download failed: {:#}", e);
                self.last = None;
                return Outcome::Fail;
            }
        };

        let extra = match shlex::split(script.options) {
            Some(extra) => extra,
            None => {
                tracing::warn!("{}", ExecError::Quoting(script.options.to_string()));
                return Outcome::Fail;
            }
        };

        let mut argv = Vec::new();
        if script.as_sudo {
            argv.push("sudo".to_string());
        }
        argv.push(script.shell.to_string());
        argv.push(file.path().to_string_lossy().into_owned());
        argv.extend(extra);

        // `file` stays alive until the child exits, then is removed on drop
        self.run_argv(argv, RunOptions::default()).await
    }

    /// Output of the previous command, if it ran
    pub fn last_output(&self) -> Option<&CapturedOutput> {
        self.last.as_ref()
    }

    /// Previous stdout decoded and stripped of trailing whitespace
    pub fn last_stdout(&self) -> Option<String> {
        self.last.as_ref().map(|o| clean_str(&o.stdout))
    }

    async fn run_argv(&mut self, argv: Vec<String>, options: RunOptions) -> Outcome {
        let sensitive = options.sensitive;
        match spawn(&argv, options).await {
            Ok(output) => {
                let outcome = Outcome::from(output.success);
                if outcome.is_fail() {
                    log_failure(&argv, &output, sensitive);
                } else if !sensitive {
                    tracing::debug!("stdout: {}", clean_str(&output.stdout));
                }
                self.last = Some(output);
                outcome
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                self.last = None;
                Outcome::Fail
            }
        }
    }

    async fn download(&self, url: &str) -> Result<NamedTempFile> {
        tracing::info!("Downloading script: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Server rejected request for {}", url))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        let mut file = tempfile::Builder::new()
            .prefix("vmsetup-")
            .suffix(".sh")
            .tempfile()
            .context("Failed to create temporary script file")?;
        file.write_all(&body)?;
        file.flush()?;

        tracing::info!("Saved {} bytes to {}", body.len(), file.path().display());
        Ok(file)
    }
}

/// Split a command line into an argument vector (quotes and escapes honored)
pub fn split_command(cmd: &str) -> Result<Vec<String>, ExecError> {
    let argv = shlex::split(cmd).ok_or_else(|| ExecError::Quoting(cmd.to_string()))?;
    if argv.is_empty() {
        return Err(ExecError::Empty);
    }
    Ok(argv)
}

/// Quote one argument so it survives `split_command` unchanged
pub fn quote_arg(arg: &str) -> Result<String, ExecError> {
    shlex::try_quote(arg)
        .map(|quoted| quoted.into_owned())
        .map_err(|_| ExecError::Quoting(arg.to_string()))
}

/// Decode command output and strip trailing whitespace
pub fn clean_str(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

async fn spawn(argv: &[String], options: RunOptions) -> Result<CapturedOutput> {
    let (program, args) = argv.split_first().ok_or(ExecError::Empty)?;
    if options.sensitive {
        tracing::info!("Running command: {} [{} arguments hidden]", program, args.len());
    } else {
        tracing::info!("Running command: {} {:?}", program, args);
    }

    let mut command = Command::new(program);
    command.args(args);

    if let Some(dir) = &options.dir {
        command.current_dir(dir);
    }

    match &options.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            command.stdout(Stdio::from(file));
        }
        None if options.capture => {
            command.stdout(Stdio::piped());
        }
        None => {
            command.stdout(Stdio::inherit());
        }
    }
    command.stderr(if options.capture {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let mut pending = None;
    match options.input {
        Input::Inherit => {
            command.stdin(Stdio::inherit());
        }
        Input::File(path) => {
            let file = open_input(&path)?;
            command.stdin(Stdio::from(file));
        }
        Input::Bytes(bytes) => {
            command.stdin(Stdio::piped());
            pending = Some(bytes);
        }
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to spawn command: {}", program))?;

    let stdin = child.stdin.take();
    let feed = async move {
        if let (Some(bytes), Some(mut stdin)) = (pending, stdin) {
            stdin.write_all(&bytes).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    };

    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    if let Err(e) = fed {
        // The child may exit without reading all of its input
        tracing::debug!("Failed to write stdin for {}: {}", program, e);
    }
    let output = output.with_context(|| format!("Failed to wait for command: {}", program))?;

    let success = output.status.success();
    tracing::info!("Command completed with success={}", success);

    Ok(CapturedOutput {
        success,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))
}

fn log_failure(argv: &[String], output: &CapturedOutput, sensitive: bool) {
    if sensitive {
        let program = argv.first().map(String::as_str).unwrap_or_default();
        tracing::warn!("Command failed: {} (arguments hidden)", program);
        return;
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let parsed = ParsedError::from_stderr(
        &stderr,
        ErrorContext {
            operation: argv.join(" "),
        },
    );
    tracing::warn!("Command failed: {}", parsed);
}

/// First word of a command line, for logs that must not show arguments
fn redacted(cmd: &str) -> String {
    let program = cmd.split_whitespace().next().unwrap_or_default();
    format!("{} [arguments hidden]", program)
}
