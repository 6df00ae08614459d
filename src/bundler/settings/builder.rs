//! Builder for constructing Settings.

use super::{
    ArtifactBundle, EvictionSettings, JavaOptions, PackageSettings, RuntimeImageSettings,
    Settings, ToolSettings, WindowsSettings, core::DEFAULT_PROCESS_TIMEOUT,
    core::default_clean_directories,
};
use crate::bundler::{Error, Result, utils::fs::absolute};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// Versions accepted by the packaging tool: 1 to 3 dot-separated numbers,
/// the first of which must not be zero.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d*(\.\d+){0,2}$").expect("version pattern is valid"));

/// Default archive location relative to the build root.
const DEFAULT_BUNDLE: &str = "libs/trading-analytics.jar";

/// Default icon resource, relative to the project directory.
pub const DEFAULT_ICON: &str = "src/main/resources/app.ico";

/// Builder for constructing [`Settings`].
///
/// Every field has a default; `build` validates values and resolves all
/// paths against the current directory.
///
/// # Examples
///
/// ```no_run
/// use fxpack::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> fxpack::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .build_root("build")
///     .bundle_path("build/libs/app.jar")
///     .package_settings(PackageSettings {
///         name: "MyApp".into(),
///         version: "2.1.0".into(),
///         ..Default::default()
///     })
///     .build()?;
/// assert_eq!(settings.app_name(), "MyApp");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package: PackageSettings,
    windows: WindowsSettings,
    java_options: JavaOptions,
    runtime_image: RuntimeImageSettings,
    eviction: EvictionSettings,
    tools: ToolSettings,
    build_root: Option<PathBuf>,
    bundle_path: Option<PathBuf>,
    icon: Option<Option<PathBuf>>,
    process_timeout: Option<Duration>,
    clean_directories: Option<Vec<PathBuf>>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the build output root.
    ///
    /// Default: `build`
    pub fn build_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the application archive path.
    ///
    /// Default: `<build_root>/libs/trading-analytics.jar`
    pub fn bundle_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.bundle_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets application metadata.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package = settings;
        self
    }

    /// Sets Windows installer flags.
    pub fn windows_settings(mut self, settings: WindowsSettings) -> Self {
        self.windows = settings;
        self
    }

    /// Sets the runtime option sets.
    pub fn java_options(mut self, options: JavaOptions) -> Self {
        self.java_options = options;
        self
    }

    /// Sets runtime image settings.
    pub fn runtime_image(mut self, settings: RuntimeImageSettings) -> Self {
        self.runtime_image = settings;
        self
    }

    /// Sets the eviction retry budget.
    pub fn eviction(mut self, settings: EvictionSettings) -> Self {
        self.eviction = settings;
        self
    }

    /// Sets tool location overrides.
    pub fn tools(mut self, tools: ToolSettings) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the icon path; `None` disables the icon entirely.
    ///
    /// Default: `src/main/resources/app.ico`
    pub fn icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Sets the external tool timeout.
    ///
    /// Default: 30 minutes
    pub fn process_timeout(mut self, timeout: Duration) -> Self {
        self.process_timeout = Some(timeout);
        self
    }

    /// Sets the directories evicted by the clean task. Relative entries are
    /// resolved against the build root.
    ///
    /// Default: [`default_clean_directories`]
    pub fn clean_directories(mut self, dirs: Vec<PathBuf>) -> Self {
        self.clean_directories = Some(dirs);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty application name or main class,
    /// a version the packaging tool rejects, a zero attempt budget or a zero
    /// timeout.
    pub fn build(self) -> Result<Settings> {
        if self.package.name.trim().is_empty() {
            return Err(Error::Config("package name must not be empty".into()));
        }
        if self.package.main_class.trim().is_empty() {
            return Err(Error::Config("main class must not be empty".into()));
        }
        if !VERSION_PATTERN.is_match(&self.package.version) {
            return Err(Error::Config(format!(
                "version `{}` is not accepted by the packaging tool (expected 1-3 numeric components, e.g. 1.0.0)",
                self.package.version
            )));
        }
        if self.eviction.max_attempts == 0 {
            return Err(Error::Config("eviction max_attempts must be at least 1".into()));
        }
        let process_timeout = self.process_timeout.unwrap_or(DEFAULT_PROCESS_TIMEOUT);
        if process_timeout.is_zero() {
            return Err(Error::Config("process timeout must be greater than zero".into()));
        }

        let build_root = absolute(self.build_root.as_deref().unwrap_or(Path::new("build")))?;
        let bundle_path = match self.bundle_path {
            Some(path) => absolute(&path)?,
            None => build_root.join(DEFAULT_BUNDLE),
        };
        let icon = match self.icon {
            Some(Some(path)) => Some(absolute(&path)?),
            Some(None) => None,
            None => Some(absolute(Path::new(DEFAULT_ICON))?),
        };
        let clean_directories = match self.clean_directories {
            Some(dirs) => dirs
                .into_iter()
                .map(|dir| {
                    if dir.is_absolute() {
                        dir
                    } else {
                        build_root.join(dir)
                    }
                })
                .collect(),
            None => default_clean_directories(&build_root),
        };

        let bundle = ArtifactBundle::new(
            bundle_path,
            self.package.name.clone(),
            self.package.version.clone(),
        );

        Ok(Settings::new(
            self.package,
            self.windows,
            self.java_options,
            self.runtime_image,
            self.eviction,
            self.tools,
            build_root,
            bundle,
            icon,
            process_timeout,
            clean_directories,
        ))
    }
}
