//! Task results and the aggregated pipeline report.

use crate::bundler::error::Error;
use crate::bundler::evict::CleanSummary;
use crate::bundler::utils::fs::format_size;
use crate::cli::OutputManager;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Why a task failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FailureReason {
    /// The application archive does not exist; the tool was not invoked.
    InputNotFound { path: PathBuf },
    /// The output directory could not be evicted.
    Eviction {
        path: PathBuf,
        attempts: u32,
        remediation: String,
    },
    /// The tool exited nonzero.
    ToolFailed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// The tool exited zero but the expected artifact is not there.
    ArtifactMissing { dest: PathBuf, expected: String },
    /// The tool command line could not be built or the tool was not found.
    Invocation { message: String },
    /// Filesystem or process error.
    Io { message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InputNotFound { path } => {
                write!(f, "input not found: {}", path.display())
            }
            FailureReason::Eviction { path, attempts, .. } => write!(
                f,
                "could not clear {} after {attempts} attempt(s)",
                path.display()
            ),
            FailureReason::ToolFailed {
                tool,
                exit_code,
                stderr,
            } => {
                match exit_code {
                    Some(code) => write!(f, "{tool} exited with code {code}")?,
                    None => write!(f, "{tool} was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            FailureReason::ArtifactMissing { dest, expected } => write!(
                f,
                "artifact missing: no {expected} in {}",
                dest.display()
            ),
            FailureReason::Invocation { message } => write!(f, "invalid invocation: {message}"),
            FailureReason::Io { message } => write!(f, "{message}"),
        }
    }
}

impl From<Error> for FailureReason {
    fn from(error: Error) -> Self {
        match error {
            Error::InvalidInvocation { .. } | Error::ToolNotFound { .. } => {
                FailureReason::Invocation {
                    message: error.to_string(),
                }
            }
            other => FailureReason::Io {
                message: other.to_string(),
            },
        }
    }
}

/// Terminal state of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TaskResult {
    /// The artifact was produced.
    Succeeded { artifact: PathBuf, size_bytes: u64 },
    /// The task failed.
    Failed { reason: FailureReason },
    /// Not run because a hard dependency did not succeed.
    Skipped { upstream: String },
    /// The tool was killed after the process timeout.
    TimedOut {
        #[serde(rename = "after_secs", serialize_with = "as_secs")]
        after: Duration,
    },
    /// Output of the clean task.
    Cleaned { summary: CleanSummary },
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs())
}

impl TaskResult {
    /// Shorthand for a failed result.
    pub fn failed(reason: impl Into<FailureReason>) -> Self {
        TaskResult::Failed {
            reason: reason.into(),
        }
    }

    /// Whether this result makes the pipeline fail.
    ///
    /// Skipped tasks do not count; the dependency that caused the skip does.
    pub fn is_failure(&self) -> bool {
        match self {
            TaskResult::Failed { .. } | TaskResult::TimedOut { .. } => true,
            TaskResult::Cleaned { summary } => !summary.is_success(),
            TaskResult::Succeeded { .. } | TaskResult::Skipped { .. } => false,
        }
    }

    /// Whether dependents of this task may run.
    pub fn is_success(&self) -> bool {
        match self {
            TaskResult::Succeeded { .. } => true,
            TaskResult::Cleaned { summary } => summary.is_success(),
            _ => false,
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskResult::Succeeded {
                artifact,
                size_bytes,
            } => write!(f, "{} ({})", artifact.display(), format_size(*size_bytes)),
            TaskResult::Failed { reason } => write!(f, "failed: {reason}"),
            TaskResult::Skipped { upstream } => write!(f, "skipped: `{upstream}` did not succeed"),
            TaskResult::TimedOut { after } => write!(f, "timed out after {}s", after.as_secs()),
            TaskResult::Cleaned { summary } => write!(f, "{summary}"),
        }
    }
}

/// One entry in the report.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub name: String,
    #[serde(flatten)]
    pub result: TaskResult,
    pub duration_ms: u64,
}

/// Ordered results of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    targets: Vec<String>,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
    tasks: Vec<TaskRecord>,
}

impl PipelineReport {
    /// Starts a report for the requested targets.
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            started_at: Local::now(),
            finished_at: None,
            tasks: Vec::new(),
        }
    }

    /// Records a task result.
    pub fn push(&mut self, name: impl Into<String>, result: TaskResult, elapsed: Duration) {
        self.tasks.push(TaskRecord {
            name: name.into(),
            result,
            duration_ms: elapsed.as_millis() as u64,
        });
    }

    /// Marks the run as finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Requested targets.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Records in execution order.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Result of the named task, if it ran.
    pub fn get(&self, name: &str) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.name == name).map(|t| &t.result)
    }

    /// Records whose result is a failure.
    pub fn failures(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter().filter(|t| t.result.is_failure())
    }

    /// True iff no task failed.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the aggregate summary.
    pub fn print_summary(&self, output: &OutputManager) {
        output.section("Summary");
        for task in &self.tasks {
            let line = format!("{}: {}", task.name, task.result);
            match &task.result {
                r if r.is_failure() => output.error(&line),
                TaskResult::Skipped { .. } => output.warn(&line),
                _ => output.success(&line),
            }
        }

        let failed = self.failures().count();
        if failed == 0 {
            output.success(&format!("All {} task(s) succeeded", self.tasks.len()));
        } else {
            output.error(&format!("{} of {} task(s) failed", failed, self.tasks.len()));
        }
    }
}
