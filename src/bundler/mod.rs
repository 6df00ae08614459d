//! Release packaging for desktop Java applications.
//!
//! Turns one application archive into portable images and Windows
//! installers by driving the JDK packaging tools, evicting stale output
//! directories that running instances keep locked.
//!
//! # Module Organization
//!
//! - [`builder`] - Target graph, orchestration and the pipeline report
//! - [`context`] - State shared by the tasks of one run
//! - [`error`] - Library error type
//! - [`evict`] - Resilient directory removal
//! - [`platform`] - Packaging and runtime image tasks
//! - [`settings`] - Validated configuration
//! - [`utils`] - Filesystem and process helpers

pub mod builder;
pub mod context;
pub mod error;
pub mod evict;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{
    FailureReason, PipelineOrchestrator, PipelineReport, STANDARD_TARGETS, Target, TargetGraph,
    TargetKind, TaskResult,
};
pub use context::TaskContext;
pub use error::{Context, Error, ErrorExt, Result};
pub use evict::{CleanSummary, DirectoryEvictor, EvictionResult, EvictionStrategies};
pub use platform::jlink::RuntimeImageTask;
pub use platform::jpackage::{PackagingInvocation, PackagingTask, Toolset};
pub use settings::{
    ArtifactBundle, EvictionPolicy, EvictionSettings, Format, JavaOptions, PackageSettings,
    RuntimeImageSettings, Settings, SettingsBuilder, ToolSettings, WindowsSettings,
};
