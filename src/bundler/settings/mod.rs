//! Configuration structures for packaging runs.
//!
//! This module provides the settings consumed by every packaging task:
//! application metadata, per-format conventions, runtime option sets,
//! eviction budget, tool locations, and a builder that validates them.

mod builder;
mod bundle;
mod core;
mod format;
mod java;
mod package;
mod runtime;
mod windows;

// Re-export all public types
pub use builder::{DEFAULT_ICON, SettingsBuilder};
pub use bundle::ArtifactBundle;
pub use core::{
    DEFAULT_PROCESS_TIMEOUT, EvictionSettings, RUNTIME_DIR_NAME, Settings, ToolSettings,
    default_clean_directories,
};
pub use format::{EvictionPolicy, Format};
pub use java::JavaOptions;
pub use package::PackageSettings;
pub use runtime::RuntimeImageSettings;
pub use windows::WindowsSettings;
