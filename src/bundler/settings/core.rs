//! Core Settings struct and implementations.

use super::{
    ArtifactBundle, Format, JavaOptions, PackageSettings, RuntimeImageSettings, WindowsSettings,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for a single packaging or runtime-builder invocation.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Directory name of the pruned runtime image under the build root.
pub const RUNTIME_DIR_NAME: &str = "runtime";

/// Retry budget and pacing for directory eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictionSettings {
    /// Rounds attempted before giving up.
    pub max_attempts: u32,

    /// Attempt `i` is followed by a pause of `i * backoff_unit`.
    pub backoff_unit: Duration,

    /// Pause after terminating processes so the OS releases file handles.
    pub termination_pause: Duration,

    /// Terminate running instances of the application before deleting.
    ///
    /// Defaults to true on Windows, where running executables lock their files.
    pub terminate_instances: bool,
}

impl Default for EvictionSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit: Duration::from_secs(2),
            termination_pause: Duration::from_secs(2),
            terminate_instances: cfg!(windows),
        }
    }
}

/// Explicit tool locations. Unset entries are resolved from `java_home`,
/// then `JAVA_HOME`, then `PATH`.
///
/// # Configuration
///
/// ```toml
/// [tools]
/// java_home = "C:/Program Files/Java/jdk-21"
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    /// JDK installation directory.
    pub java_home: Option<PathBuf>,

    /// Packaging tool executable.
    pub jpackage: Option<PathBuf>,

    /// Runtime image builder executable.
    pub jlink: Option<PathBuf>,
}

/// Main settings for a pipeline run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which
/// validates values and makes paths absolute.
#[derive(Clone, Debug)]
pub struct Settings {
    package: PackageSettings,
    windows: WindowsSettings,
    java_options: JavaOptions,
    runtime_image: RuntimeImageSettings,
    eviction: EvictionSettings,
    tools: ToolSettings,
    build_root: PathBuf,
    bundle: ArtifactBundle,
    icon: Option<PathBuf>,
    process_timeout: Duration,
    clean_directories: Vec<PathBuf>,
}

impl Settings {
    /// Application metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the application name.
    pub fn app_name(&self) -> &str {
        &self.package.name
    }

    /// Windows installer flags.
    pub fn windows(&self) -> &WindowsSettings {
        &self.windows
    }

    /// Runtime option sets.
    pub fn java_options(&self) -> &JavaOptions {
        &self.java_options
    }

    /// Runtime image settings.
    pub fn runtime_image(&self) -> &RuntimeImageSettings {
        &self.runtime_image
    }

    /// Eviction retry budget.
    pub fn eviction(&self) -> &EvictionSettings {
        &self.eviction
    }

    /// Tool location overrides.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Root under which every output and temp directory lives.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// The application archive to package.
    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Configured icon path. Whether it exists is checked when an
    /// invocation is built.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// Timeout applied to every external tool invocation.
    pub fn process_timeout(&self) -> Duration {
        self.process_timeout
    }

    /// Directories evicted by the clean task.
    pub fn clean_directories(&self) -> &[PathBuf] {
        &self.clean_directories
    }

    /// Output directory for a format.
    ///
    /// For [`Format::ExeTimestamped`] use [`Settings::timestamped_output_dir`];
    /// this returns the shared prefix directory.
    pub fn output_dir(&self, format: Format) -> PathBuf {
        self.build_root.join(format.output_dir_name())
    }

    /// Output directory of a timestamp-isolated run.
    pub fn timestamped_output_dir(&self, millis: i64) -> PathBuf {
        self.build_root
            .join(format!("{}-{millis}", Format::ExeTimestamped.output_dir_name()))
    }

    /// Temp directory of a timestamp-isolated run.
    pub fn timestamped_temp_dir(&self, millis: i64) -> PathBuf {
        self.build_root
            .join(format!("{}-{millis}", Format::ExeTimestamped.temp_dir_name()))
    }

    /// Dedicated temp directory for a format.
    pub fn temp_dir(&self, format: Format) -> PathBuf {
        self.build_root.join(format.temp_dir_name())
    }

    /// Output directory of the pruned runtime image.
    pub fn runtime_dir(&self) -> PathBuf {
        self.build_root.join(RUNTIME_DIR_NAME)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        windows: WindowsSettings,
        java_options: JavaOptions,
        runtime_image: RuntimeImageSettings,
        eviction: EvictionSettings,
        tools: ToolSettings,
        build_root: PathBuf,
        bundle: ArtifactBundle,
        icon: Option<PathBuf>,
        process_timeout: Duration,
        clean_directories: Vec<PathBuf>,
    ) -> Self {
        Self {
            package,
            windows,
            java_options,
            runtime_image,
            eviction,
            tools,
            build_root,
            bundle,
            icon,
            process_timeout,
            clean_directories,
        }
    }
}

/// Known output directories under `build_root`: every fixed-name format
/// output, the runtime image and every per-format temp directory.
///
/// Timestamp-isolated outputs are never included; they are unique per run.
pub fn default_clean_directories(build_root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Format::ALL
        .iter()
        .filter(|f| **f != Format::ExeTimestamped)
        .map(|f| build_root.join(f.output_dir_name()))
        .collect();
    dirs.push(build_root.join(RUNTIME_DIR_NAME));
    dirs.extend(Format::ALL.iter().map(|f| build_root.join(f.temp_dir_name())));
    dirs
}
