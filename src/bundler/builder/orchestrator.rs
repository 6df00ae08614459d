//! Sequential execution of planned targets.

use super::report::{FailureReason, PipelineReport, TaskResult};
use super::targets::{Target, TargetGraph, TargetKind};
use crate::bundler::context::TaskContext;
use crate::bundler::error::Result;
use crate::bundler::evict::clean_directories;
use crate::bundler::platform::jlink::RuntimeImageTask;
use crate::bundler::platform::jpackage::PackagingTask;
use std::time::Instant;

/// Runs pipeline targets in dependency order and aggregates the results.
///
/// # Examples
///
/// ```no_run
/// use fxpack::bundler::{PipelineOrchestrator, SettingsBuilder, TaskContext, Toolset};
/// use fxpack::cli::OutputManager;
///
/// # async fn example() -> fxpack::bundler::Result<()> {
/// let settings = SettingsBuilder::new().build_root("build").build()?;
/// let toolset = Toolset::resolve(settings.tools())?;
/// let ctx = TaskContext::new(settings, toolset, OutputManager::new(false, false));
///
/// let orchestrator = PipelineOrchestrator::new(ctx)?;
/// let report = orchestrator.run_composite(&["build-all"]).await?;
/// println!("success: {}", report.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PipelineOrchestrator {
    ctx: TaskContext,
    graph: TargetGraph,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator over the standard targets.
    pub fn new(ctx: TaskContext) -> Result<Self> {
        Ok(Self::with_graph(ctx, TargetGraph::standard()?))
    }

    /// Creates an orchestrator over a custom graph.
    pub fn with_graph(ctx: TaskContext, graph: TargetGraph) -> Self {
        Self { ctx, graph }
    }

    pub fn graph(&self) -> &TargetGraph {
        &self.graph
    }

    pub fn context(&self) -> &TaskContext {
        &self.ctx
    }

    /// Runs the requested targets and everything they depend on.
    ///
    /// # Errors
    ///
    /// Only for requests naming an unknown target, in which case nothing
    /// runs. Task failures are recorded in the report.
    pub async fn run_composite<S: AsRef<str>>(&self, requested: &[S]) -> Result<PipelineReport> {
        let plan = self.graph.plan(requested)?;
        let requested = requested.iter().map(|s| s.as_ref().to_string()).collect();
        Ok(self.run_plan(requested, &plan).await)
    }

    /// Runs an already planned sequence of tasks.
    pub async fn run_plan(&self, requested: Vec<String>, plan: &[&Target]) -> PipelineReport {
        let output = self.ctx.output();
        let mut report = PipelineReport::new(requested);

        log::info!(
            "Planned {} task(s): {}",
            plan.len(),
            plan.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
        );

        for target in plan {
            output.section(target.name);
            let started = Instant::now();

            let blocked = target
                .requires
                .iter()
                .find(|req| !report.get(req).is_some_and(TaskResult::is_success));
            let result = match blocked {
                Some(upstream) => TaskResult::Skipped {
                    upstream: upstream.to_string(),
                },
                None => self.run_target(target).await,
            };

            self.print_result(target, &result);
            report.push(target.name, result, started.elapsed());
        }

        report.finish();
        report
    }

    async fn run_target(&self, target: &Target) -> TaskResult {
        match target.kind {
            TargetKind::Package(format) => PackagingTask::new(format).run(&self.ctx).await,
            TargetKind::RuntimeImage => RuntimeImageTask.run(&self.ctx).await,
            TargetKind::Clean => {
                let summary = clean_directories(
                    self.ctx.evictor(),
                    self.ctx.settings().clean_directories(),
                    self.ctx.output(),
                )
                .await;
                TaskResult::Cleaned { summary }
            }
            TargetKind::Composite => TaskResult::Skipped {
                upstream: target.name.to_string(),
            },
        }
    }

    fn print_result(&self, target: &Target, result: &TaskResult) {
        let output = self.ctx.output();
        match result {
            TaskResult::Failed {
                reason: FailureReason::Eviction { remediation, .. },
            } => {
                output.error(&format!("{}: {}", target.name, result));
                output.error(remediation);
            }
            TaskResult::Failed {
                reason: FailureReason::InputNotFound { .. },
            } => {
                output.error(&format!("{}: {}", target.name, result));
                output.indent("Build the application archive first, or pass --bundle");
            }
            r if r.is_failure() => output.error(&format!("{}: {}", target.name, r)),
            TaskResult::Skipped { .. } => output.warn(&format!("{}: {}", target.name, result)),
            _ => output.success(&format!("{}: {}", target.name, result)),
        }
    }
}
