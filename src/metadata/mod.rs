//! The `fxpack.toml` project manifest.
//!
//! Every section and key is optional; an absent key keeps the default that
//! reproduces the conventional project layout. Relative paths are resolved
//! against the directory containing the manifest.

use crate::bundler::settings::DEFAULT_ICON;
use crate::bundler::{
    EvictionSettings, JavaOptions, PackageSettings, RuntimeImageSettings, SettingsBuilder,
    ToolSettings, WindowsSettings,
};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "fxpack.toml";

/// Locations of inputs and outputs.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    /// Root of every output and temp directory.
    pub build_root: Option<PathBuf>,
    /// Application archive.
    pub bundle: Option<PathBuf>,
    /// Launcher icon.
    pub icon: Option<PathBuf>,
}

/// Eviction retry budget.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvictionSection {
    pub max_attempts: Option<u32>,
    pub backoff_secs: Option<u64>,
    pub termination_pause_secs: Option<u64>,
    pub terminate_instances: Option<bool>,
}

/// External process limits.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessSection {
    pub timeout_secs: Option<u64>,
}

/// Directories removed by `clean-outputs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanSection {
    /// Replaces the default list; relative entries are under the build root.
    pub directories: Option<Vec<PathBuf>>,
}

/// Parsed `fxpack.toml`.
///
/// # Example
///
/// ```toml
/// [package]
/// name = "TradingAnalytics"
/// version = "1.2.0"
///
/// [paths]
/// bundle = "build/libs/trading-analytics.jar"
///
/// [eviction]
/// max_attempts = 3
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub package: PackageSettings,
    pub paths: PathsSection,
    pub windows: WindowsSettings,
    pub java_options: JavaOptions,
    pub runtime_image: RuntimeImageSettings,
    pub eviction: EvictionSection,
    pub process: ProcessSection,
    pub clean: CleanSection,
    pub tools: ToolSettings,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Manifest {
    /// Parses manifest text. Relative paths stay relative to the current
    /// directory.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::ConfigUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut manifest = Self::parse(&text)?;
        manifest.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        log::debug!("Loaded manifest {}", path.display());
        Ok(manifest)
    }

    /// Loads `path` if given (it must exist), otherwise `fxpack.toml` in the
    /// current directory if present, otherwise defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(MANIFEST_FILE).is_file() => Self::load(Path::new(MANIFEST_FILE)),
            None => {
                log::debug!("No {} found, using defaults", MANIFEST_FILE);
                Ok(Self::default())
            }
        }
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    /// Converts the manifest into a settings builder.
    pub fn into_builder(self) -> SettingsBuilder {
        let defaults = EvictionSettings::default();
        let eviction = EvictionSettings {
            max_attempts: self.eviction.max_attempts.unwrap_or(defaults.max_attempts),
            backoff_unit: self
                .eviction
                .backoff_secs
                .map_or(defaults.backoff_unit, Duration::from_secs),
            termination_pause: self
                .eviction
                .termination_pause_secs
                .map_or(defaults.termination_pause, Duration::from_secs),
            terminate_instances: self
                .eviction
                .terminate_instances
                .unwrap_or(defaults.terminate_instances),
        };

        let tools = ToolSettings {
            java_home: self.tools.java_home.clone().map(|p| self.resolve(p)),
            jpackage: self.tools.jpackage.clone().map(|p| self.resolve(p)),
            jlink: self.tools.jlink.clone().map(|p| self.resolve(p)),
        };

        let build_root = self
            .paths
            .build_root
            .clone()
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.resolve(PathBuf::from("build")));

        let mut builder = SettingsBuilder::new()
            .build_root(&build_root)
            .eviction(eviction)
            .tools(tools);
        if let Some(bundle) = self.paths.bundle.clone() {
            builder = builder.bundle_path(self.resolve(bundle));
        }
        let icon = self
            .paths
            .icon
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ICON));
        builder = builder.icon(Some(self.resolve(icon)));
        if let Some(secs) = self.process.timeout_secs {
            builder = builder.process_timeout(Duration::from_secs(secs));
        }
        if let Some(dirs) = self.clean.directories.clone() {
            builder = builder.clean_directories(dirs);
        }

        builder
            .package_settings(self.package)
            .windows_settings(self.windows)
            .java_options(self.java_options)
            .runtime_image(self.runtime_image)
    }
}
