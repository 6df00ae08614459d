//! Pruned runtime image for the runtime-embedded installer.

use crate::bundler::builder::{FailureReason, TaskResult};
use crate::bundler::context::TaskContext;
use crate::bundler::error::Result;
use crate::bundler::platform::invocation::{Invocation, InvocationBuilder};
use crate::bundler::settings::Settings;
use crate::bundler::utils::fs::{artifact_size, format_size};
use crate::bundler::utils::process::{ProcessOutcome, STDERR_SUMMARY_LINES};
use std::path::Path;

const REQUIRED: &[&str] = &["--add-modules", "--output"];

/// Builds the runtime image at [`Settings::runtime_dir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeImageTask;

impl RuntimeImageTask {
    /// Runs the task to a terminal result.
    ///
    /// The output directory is evicted with warning policy and left absent;
    /// the runtime builder refuses to write into an existing directory.
    pub async fn run(&self, ctx: &TaskContext) -> TaskResult {
        let settings = ctx.settings();
        let output = ctx.output();
        let runtime_dir = settings.runtime_dir();

        let evicted = ctx.evictor().evict(&runtime_dir).await;
        if !evicted.is_evicted() {
            output.warn(&format!("{evicted}, continuing"));
        }

        let invocation = match ctx
            .toolset()
            .jlink()
            .and_then(|jlink| build_runtime_invocation(settings, jlink, &runtime_dir))
        {
            Ok(invocation) => invocation,
            Err(e) => return TaskResult::failed(e),
        };

        output.progress(&format!("Building runtime image into {}", runtime_dir.display()));
        output.verbose(&invocation.command().display_line());

        match ctx.runner().run(&invocation.command()).await {
            Ok(ProcessOutcome::Exited(finished)) if finished.success() => {
                if !runtime_dir.is_dir() {
                    return TaskResult::failed(FailureReason::ArtifactMissing {
                        dest: runtime_dir,
                        expected: "runtime image directory".into(),
                    });
                }
                match artifact_size(&runtime_dir) {
                    Ok(size_bytes) => {
                        log::info!("Runtime image is {}", format_size(size_bytes));
                        TaskResult::Succeeded {
                            artifact: runtime_dir,
                            size_bytes,
                        }
                    }
                    Err(e) => TaskResult::failed(e),
                }
            }
            Ok(ProcessOutcome::Exited(finished)) => TaskResult::failed(FailureReason::ToolFailed {
                tool: invocation.tool().to_string(),
                exit_code: finished.exit_code(),
                stderr: finished.stderr_summary(STDERR_SUMMARY_LINES),
            }),
            Ok(ProcessOutcome::TimedOut { after }) => TaskResult::TimedOut { after },
            Err(e) => TaskResult::failed(e),
        }
    }
}

/// `jlink --add-modules <m1,m2,...> --output <dir> --compress <n> [...]`.
pub fn build_runtime_invocation(settings: &Settings, jlink: &Path, output_dir: &Path) -> Result<Invocation> {
    let runtime = settings.runtime_image();
    InvocationBuilder::new("jlink", jlink, REQUIRED, &[])
        .value("--add-modules", runtime.modules.join(","))
        .path("--output", output_dir)
        .value("--compress", &runtime.compress)
        .switch_if(runtime.no_header_files, "--no-header-files")
        .switch_if(runtime.no_man_pages, "--no-man-pages")
        .build()
}
