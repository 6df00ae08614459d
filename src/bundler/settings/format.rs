//! Packaging formats and their per-format conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format produced by one packaging task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Portable application image (no installer).
    AppImage,
    /// EXE installer.
    Exe,
    /// MSI installer.
    Msi,
    /// EXE installer bundling a pruned runtime image.
    ExeWithRuntime,
    /// EXE installer written to a fresh, time-derived directory.
    ExeTimestamped,
    /// Application image with a distinct name and minimal options, for troubleshooting.
    DebugAppImage,
}

/// What a packaging task does when its output directory cannot be evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Abort the task with a remediation message.
    Fatal,
    /// Log a warning and let the packaging tool overwrite what it can.
    Warn,
    /// Never evict; the output path is unique by construction.
    Skip,
}

impl Format {
    /// Every format, in the order they are listed to operators.
    pub const ALL: [Format; 6] = [
        Format::AppImage,
        Format::Exe,
        Format::Msi,
        Format::ExeWithRuntime,
        Format::ExeTimestamped,
        Format::DebugAppImage,
    ];

    /// Stable identifier used in configuration and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::AppImage => "app-image",
            Format::Exe => "exe",
            Format::Msi => "msi",
            Format::ExeWithRuntime => "exe-with-runtime",
            Format::ExeTimestamped => "exe-timestamped",
            Format::DebugAppImage => "debug-app-image",
        }
    }

    /// Value passed to the packaging tool's `--type` flag.
    pub fn package_type(self) -> &'static str {
        match self {
            Format::AppImage | Format::DebugAppImage => "app-image",
            Format::Exe | Format::ExeWithRuntime | Format::ExeTimestamped => "exe",
            Format::Msi => "msi",
        }
    }

    /// File extension of the produced artifact, `None` for image formats
    /// whose artifact is a directory.
    pub fn artifact_extension(self) -> Option<&'static str> {
        match self {
            Format::AppImage | Format::DebugAppImage => None,
            Format::Exe | Format::ExeWithRuntime | Format::ExeTimestamped => Some("exe"),
            Format::Msi => Some("msi"),
        }
    }

    /// How eviction failures of the output directory are treated.
    pub fn eviction_policy(self) -> EvictionPolicy {
        match self {
            Format::Exe | Format::Msi | Format::ExeWithRuntime => EvictionPolicy::Fatal,
            Format::AppImage | Format::DebugAppImage => EvictionPolicy::Warn,
            Format::ExeTimestamped => EvictionPolicy::Skip,
        }
    }

    /// Output directory name under the build root.
    ///
    /// For [`Format::ExeTimestamped`] this is the prefix; the actual
    /// directory is `installer-<millis>`.
    pub fn output_dir_name(self) -> &'static str {
        match self {
            Format::AppImage => "portable",
            Format::Exe | Format::ExeTimestamped => "installer",
            Format::Msi => "installer-msi",
            Format::ExeWithRuntime => "installer-runtime",
            Format::DebugAppImage => "installer-debug",
        }
    }

    /// Dedicated temp directory name under the build root.
    pub fn temp_dir_name(self) -> &'static str {
        match self {
            Format::AppImage => "jpackage-temp-portable",
            Format::Exe => "jpackage-temp-exe",
            Format::Msi => "jpackage-temp-msi",
            Format::ExeWithRuntime => "jpackage-temp-runtime",
            Format::ExeTimestamped => "jpackage-temp-safe",
            Format::DebugAppImage => "jpackage-temp-debug",
        }
    }

    /// Application name used for this format's artifact.
    pub fn image_name(self, app_name: &str) -> String {
        match self {
            Format::DebugAppImage => format!("{app_name}Debug"),
            _ => app_name.to_string(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<_> = Format::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown format `{s}` (valid: {})", valid.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_formats_are_fatal_on_eviction_failure() {
        for format in Format::ALL {
            let expected = match format {
                Format::Exe | Format::Msi | Format::ExeWithRuntime => EvictionPolicy::Fatal,
                Format::AppImage | Format::DebugAppImage => EvictionPolicy::Warn,
                Format::ExeTimestamped => EvictionPolicy::Skip,
            };
            assert_eq!(format.eviction_policy(), expected, "{format}");
        }
    }

    #[test]
    fn temp_directories_are_distinct_per_format() {
        let mut names: Vec<_> = Format::ALL.iter().map(|f| f.temp_dir_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Format::ALL.len());
    }

    #[test]
    fn parses_identifiers_case_insensitively() {
        assert_eq!("MSI".parse::<Format>().unwrap(), Format::Msi);
        assert_eq!("exe-with-runtime".parse::<Format>().unwrap(), Format::ExeWithRuntime);
        assert!("deb".parse::<Format>().is_err());
    }

    #[test]
    fn debug_image_has_distinct_name() {
        assert_eq!(Format::DebugAppImage.image_name("App"), "AppDebug");
        assert_eq!(Format::AppImage.image_name("App"), "App");
    }
}
