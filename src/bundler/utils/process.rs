//! External process execution.
//!
//! [`ProcessRunner`] runs the packaging tools: output is streamed to the
//! operator while stderr is captured for failure reports, and every run is
//! bounded by a timeout after which the process is killed. A nonzero exit is
//! reported as data, never as an error; only failures to spawn or wait are
//! errors.
//!
//! [`run_blocking`] runs the short OS helper commands used during eviction.

use crate::bundler::error::{Error, Result};
use crate::cli::OutputManager;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};

/// Lines of captured stderr kept in a tool failure.
pub const STDERR_SUMMARY_LINES: usize = 10;

/// Grace period for a killed process to be reaped.
const KILL_GRACE: Duration = Duration::from_secs(10);

/// Program and arguments of one external command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpec {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, in order.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Human-readable command line, quoting arguments that contain spaces.
    pub fn display_line(&self) -> String {
        let mut line = quote(&self.program.display().to_string());
        for arg in &self.args {
            line.push(' ');
            line.push_str(&quote(arg));
        }
        line
    }
}

fn quote(s: &str) -> String {
    if s.contains(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

/// Exit status and captured stderr of a finished process.
#[derive(Debug)]
pub struct ProcessOutput {
    /// Exit status of the process
    pub status: ExitStatus,
    /// Captured stderr lines
    pub stderr_lines: Vec<String>,
}

impl ProcessOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, `None` if the process was terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    /// The last `max_lines` non-empty stderr lines joined by newlines.
    pub fn stderr_summary(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self
            .stderr_lines
            .iter()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// How a process run ended.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The process exited on its own (with any status).
    Exited(ProcessOutput),
    /// The timeout elapsed and the process was killed.
    TimedOut {
        /// The timeout that elapsed
        after: Duration,
    },
}

/// Runs external tools with streamed output and a hard timeout.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    timeout: Duration,
    output: OutputManager,
}

impl ProcessRunner {
    /// Creates a runner.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum runtime of a single process
    /// * `output` - Where streamed tool output is printed
    pub fn new(timeout: Duration, output: OutputManager) -> Self {
        Self { timeout, output }
    }

    /// Timeout applied to each run.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs a command to completion or timeout.
    ///
    /// Stdout lines are shown in verbose mode, stderr lines always; stderr is
    /// also captured for the returned [`ProcessOutput`].
    ///
    /// # Errors
    ///
    /// [`Error::CommandFailed`] if the process cannot be spawned or awaited.
    pub async fn run(&self, command: &CommandSpec) -> Result<ProcessOutcome> {
        log::debug!("Running: {}", command.display_line());

        let mut child = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command.display_line(),
                error,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let output = &self.output;
        let child_ref = &mut child;

        // Both streams and the exit must complete within the timeout
        let waited = tokio::time::timeout(self.timeout, async move {
            let (_, stderr_lines) =
                tokio::join!(stream_stdout(stdout, output), capture_stderr(stderr, output));
            child_ref
                .wait()
                .await
                .map(|status| ProcessOutput { status, stderr_lines })
        })
        .await;

        match waited {
            Ok(Ok(finished)) => {
                log::debug!(
                    "{} exited with {:?}",
                    command.program().display(),
                    finished.exit_code()
                );
                Ok(ProcessOutcome::Exited(finished))
            }
            Ok(Err(error)) => Err(Error::CommandFailed {
                command: command.display_line(),
                error,
            }),
            Err(_elapsed) => {
                self.output.warn(&format!(
                    "{} did not finish within {} seconds, terminating...",
                    command.program().display(),
                    self.timeout.as_secs()
                ));

                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill {}: {}", command.program().display(), e);
                }
                let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;

                Ok(ProcessOutcome::TimedOut {
                    after: self.timeout,
                })
            }
        }
    }
}

async fn stream_stdout(stdout: Option<ChildStdout>, output: &OutputManager) {
    if let Some(stdout) = stdout {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            output.detail(&line);
        }
    }
}

async fn capture_stderr(stderr: Option<ChildStderr>, output: &OutputManager) -> Vec<String> {
    let mut captured = Vec::new();
    if let Some(stderr) = stderr {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            output.indent(&line);
            captured.push(line);
        }
    }
    captured
}

/// Runs a short helper command synchronously with all stdio discarded.
///
/// Returns `Ok(None)` if the command was killed after `timeout`.
pub fn run_blocking(
    command: &mut std::process::Command,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    use wait_timeout::ChildExt;

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Some(status)),
        None => {
            let _ = child.kill();
            child.wait()?;
            Ok(None)
        }
    }
}
