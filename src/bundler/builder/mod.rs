//! Pipeline orchestration.
//!
//! This module provides the [`PipelineOrchestrator`] that plans requested
//! targets against the [`TargetGraph`], runs each task once in dependency
//! order and aggregates their [`TaskResult`]s into a [`PipelineReport`].
//!
//! # Module Organization
//!
//! - [`orchestrator`] - Sequential execution of a plan
//! - [`report`] - Task results, failure reasons and the report
//! - [`targets`] - Declared targets and dependency planning

mod orchestrator;
mod report;
mod targets;

pub use orchestrator::PipelineOrchestrator;
pub use report::{FailureReason, PipelineReport, TaskRecord, TaskResult};
pub use targets::{STANDARD_TARGETS, Target, TargetGraph, TargetKind};
