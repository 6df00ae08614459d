//! Packaging tasks driven by the JDK packaging tool.
//!
//! A [`PackagingTask`] turns the application archive into one [`Format`]:
//!
//! 1. Checks that the archive exists
//! 2. Evicts the output and temp directories according to the format's
//!    policy, or picks fresh ones for timestamp-isolated output
//! 3. Recreates it and builds the [`PackagingInvocation`]
//! 4. Runs the tool under the process timeout
//! 5. Confirms the expected artifact exists
//!
//! Every outcome is a [`TaskResult`]; nothing here returns an error.

mod artifact;
mod invocation;
mod toolset;

pub use artifact::find_artifact;
pub use invocation::{PackagingInvocation, build_invocation};
pub use toolset::Toolset;

use crate::bundler::builder::{FailureReason, TaskResult};
use crate::bundler::context::TaskContext;
use crate::bundler::evict::remediation;
use crate::bundler::settings::{EvictionPolicy, Format, Settings};
use crate::bundler::utils::fs::{
    artifact_size, format_size, path_exists, recreate_dir, remove_dir_all,
};
use crate::bundler::utils::process::{ProcessOutcome, STDERR_SUMMARY_LINES};
use std::path::{Path, PathBuf};

/// Produces one packaging format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagingTask {
    format: Format,
}

impl PackagingTask {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Runs the task to a terminal result.
    pub async fn run(&self, ctx: &TaskContext) -> TaskResult {
        let bundle = ctx.settings().bundle();
        if !bundle.exists() {
            return TaskResult::failed(FailureReason::InputNotFound {
                path: bundle.path().to_path_buf(),
            });
        }

        let (dest, temp) = match self.prepare_output(ctx).await {
            Ok(dirs) => dirs,
            Err(reason) => return TaskResult::failed(reason),
        };

        let result = self.package(ctx, &dest, &temp).await;

        // Isolated runs leave only their own temp directory behind
        if self.format.eviction_policy() == EvictionPolicy::Skip
            && let Err(e) = remove_dir_all(&temp)
        {
            log::warn!("Could not remove {}: {}", temp.display(), e);
        }
        result
    }

    async fn package(&self, ctx: &TaskContext, dest: &Path, temp: &Path) -> TaskResult {
        let settings = ctx.settings();
        let output = ctx.output();
        let format = self.format;

        let invocation = match build_invocation(settings, ctx.toolset(), format, dest, temp) {
            Ok(invocation) => invocation,
            Err(e) => return TaskResult::failed(e),
        };

        output.progress(&format!("Packaging {} into {}", format, dest.display()));
        output.verbose(&invocation.command().display_line());

        let finished = match ctx.runner().run(&invocation.command()).await {
            Ok(ProcessOutcome::Exited(finished)) => finished,
            Ok(ProcessOutcome::TimedOut { after }) => return TaskResult::TimedOut { after },
            Err(e) => return TaskResult::failed(e),
        };
        if !finished.success() {
            return TaskResult::failed(FailureReason::ToolFailed {
                tool: invocation.tool().to_string(),
                exit_code: finished.exit_code(),
                stderr: finished.stderr_summary(STDERR_SUMMARY_LINES),
            });
        }

        self.validate(settings, dest)
    }

    /// Evicts (or, for timestamped output, picks) and creates the output
    /// directory. Returns the directories the tool writes into and uses as
    /// scratch space.
    ///
    /// Timestamp-isolated runs never evict anything: both directories are
    /// fresh paths derived from the same timestamp.
    async fn prepare_output(&self, ctx: &TaskContext) -> Result<(PathBuf, PathBuf), FailureReason> {
        let settings = ctx.settings();
        let output = ctx.output();
        let evictor = ctx.evictor();

        let (dest, temp) = match self.format.eviction_policy() {
            EvictionPolicy::Skip => {
                let millis = unique_timestamp(settings);
                let dest = settings.timestamped_output_dir(millis);
                log::info!("Writing to fresh directory {}", dest.display());
                (dest, settings.timestamped_temp_dir(millis))
            }
            policy => {
                let dest = settings.output_dir(self.format);
                let result = evictor.evict(&dest).await;
                if !result.is_evicted() {
                    if policy == EvictionPolicy::Fatal {
                        return Err(FailureReason::Eviction {
                            path: dest.clone(),
                            attempts: result.attempt_count(),
                            remediation: remediation(&dest, settings.app_name()),
                        });
                    }
                    output.warn(&format!("{result}, continuing"));
                }

                // The tool requires a new or empty temp directory
                let temp = settings.temp_dir(self.format);
                let temp_result = evictor.evict(&temp).await;
                if !temp_result.is_evicted() {
                    output.warn(&format!("{temp_result}, continuing"));
                }
                (dest, temp)
            }
        };

        recreate_dir(&dest).await.map_err(FailureReason::from)?;
        Ok((dest, temp))
    }

    fn validate(&self, settings: &Settings, dest: &Path) -> TaskResult {
        let expected = match self.format.artifact_extension() {
            Some(extension) => format!("*.{extension} file"),
            None => format!("{} directory", self.format.image_name(settings.app_name())),
        };

        let artifact = match find_artifact(self.format, dest, settings.app_name()) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => {
                return TaskResult::failed(FailureReason::ArtifactMissing {
                    dest: dest.to_path_buf(),
                    expected,
                });
            }
            Err(e) => return TaskResult::failed(e),
        };

        match artifact_size(&artifact) {
            Ok(size_bytes) => {
                log::info!("{} is {}", artifact.display(), format_size(size_bytes));
                TaskResult::Succeeded {
                    artifact,
                    size_bytes,
                }
            }
            Err(e) => TaskResult::failed(e),
        }
    }
}

/// Current time in millis, bumped forward until neither the isolated output
/// directory nor its temp directory exists.
fn unique_timestamp(settings: &Settings) -> i64 {
    let mut millis = chrono::Utc::now().timestamp_millis();
    while path_exists(&settings.timestamped_output_dir(millis))
        || path_exists(&settings.timestamped_temp_dir(millis))
    {
        millis += 1;
    }
    millis
}
