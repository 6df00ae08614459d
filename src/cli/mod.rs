//! Command line interface for fxpack.
//!
//! Loads the manifest, applies command line overrides, resolves the JDK
//! tools and runs the requested targets, printing progress and a final
//! summary.

mod args;
pub mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{
    PipelineOrchestrator, Settings, TargetGraph, TargetKind, TaskContext, Toolset,
};
use crate::error::Result;
use crate::metadata::Manifest;
use anyhow::Context as _;

/// Main CLI entry point: runs parsed arguments and returns the process exit
/// code.
pub async fn run_with(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);
    let output = config.output();
    let graph = TargetGraph::standard()?;

    if args.list {
        print_targets(&graph);
        return Ok(0);
    }

    // Unknown targets abort before configuration is even read
    let plan = graph.plan(&args.targets)?;

    let mut manifest = Manifest::discover(args.config.as_deref())?;
    args.apply_overrides(&mut manifest);
    let settings = manifest.into_builder().build()?;
    log::debug!("Settings: {:?}", settings);

    let needs_tools = plan.iter().any(|t| t.kind != TargetKind::Clean);
    let toolset = resolve_toolset(&settings, needs_tools)?;

    let ctx = TaskContext::new(settings, toolset, output.clone());
    let orchestrator = PipelineOrchestrator::with_graph(ctx, graph);
    let report = orchestrator.run_composite(&args.targets).await?;
    report.print_summary(output);

    if let Some(path) = &args.report_json {
        let json = report.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        output.verbose(&format!("Report written to {}", path.display()));
    }

    Ok(if report.is_success() { 0 } else { 1 })
}

fn resolve_toolset(settings: &Settings, needs_tools: bool) -> Result<Toolset> {
    if needs_tools {
        return Ok(Toolset::resolve(settings.tools())?);
    }
    // Cleaning never runs a tool, so a missing JDK must not block it
    Ok(Toolset::resolve(settings.tools()).unwrap_or_else(|_| Toolset::new("jpackage", None)))
}

fn print_targets(graph: &TargetGraph) {
    let width = graph.targets().iter().map(|t| t.name.len()).max().unwrap_or(0);
    for target in graph.targets() {
        let mut line = format!("{:width$}  {}", target.name, target.description);
        if !target.depends_on.is_empty() {
            line.push_str(&format!(" [{}]", target.depends_on.join(", ")));
        }
        println!("{line}");
    }
}
