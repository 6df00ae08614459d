//! Release packaging pipeline for desktop Java applications
//!
//! This library turns one application archive into:
//! - A portable application image
//! - EXE and MSI installers, optionally with an embedded runtime image
//! - Diagnostic variants (timestamp-isolated installer, debug image)
//!
//! Output directories are evicted before every build, terminating stale
//! application instances that keep them locked. It can be used both as a
//! CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{CliError, PipelineError, Result};
