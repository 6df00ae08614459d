//! Per-format packaging tool command lines.

use super::toolset::Toolset;
use crate::bundler::error::{Error, Result};
use crate::bundler::platform::invocation::{Invocation, InvocationBuilder};
use crate::bundler::settings::{Format, Settings};
use std::path::Path;

/// A packaging tool command line for one output target.
pub type PackagingInvocation = Invocation;

const REQUIRED: &[&str] = &[
    "--input",
    "--name",
    "--main-jar",
    "--main-class",
    "--type",
    "--dest",
    "--temp",
];

const REPEATABLE: &[&str] = &["--java-options"];

/// Builds the packaging invocation for `format` writing into `dest`.
///
/// The icon flag is included only if the configured icon exists when this
/// is called. `temp` must be new or empty when the tool runs.
///
/// # Errors
///
/// [`Error::InvalidInvocation`] if the resulting command line fails
/// validation, for example because the archive path has no file name.
pub fn build_invocation(
    settings: &Settings,
    toolset: &Toolset,
    format: Format,
    dest: &Path,
    temp: &Path,
) -> Result<PackagingInvocation> {
    let bundle = settings.bundle();
    let package = settings.package();
    let main_jar = bundle.file_name().ok_or_else(|| Error::InvalidInvocation {
        tool: "jpackage".into(),
        reason: format!("archive path {} has no file name", bundle.path().display()),
    })?;

    let mut builder = InvocationBuilder::new("jpackage", toolset.jpackage(), REQUIRED, REPEATABLE)
        .path("--input", bundle.input_dir())
        .value("--name", format.image_name(settings.app_name()))
        .value("--main-jar", main_jar)
        .value("--main-class", &package.main_class)
        .value("--type", format.package_type())
        .path("--dest", dest)
        .value("--app-version", &package.version)
        .value("--vendor", &package.vendor)
        .switch("--verbose")
        .path("--temp", temp);

    match settings.icon() {
        Some(icon) if icon.is_file() => builder = builder.path("--icon", icon),
        Some(icon) => log::debug!("Icon {} not found, packaging without it", icon.display()),
        None => {}
    }

    let windows = settings.windows();
    match format {
        Format::Exe | Format::Msi => {
            builder = builder
                .value_opt("--copyright", package.copyright.as_deref())
                .value_opt("--description", package.description.as_deref())
                .switch_if(windows.dir_chooser, "--win-dir-chooser")
                .switch_if(windows.menu, "--win-menu")
                .switch_if(windows.shortcut, "--win-shortcut")
                .switch_if(windows.per_user_install, "--win-per-user-install");
        }
        Format::ExeWithRuntime => {
            builder = builder
                .path("--runtime-image", &settings.runtime_dir())
                .switch_if(windows.dir_chooser, "--win-dir-chooser")
                .switch_if(windows.menu, "--win-menu")
                .switch_if(windows.shortcut, "--win-shortcut");
        }
        Format::AppImage | Format::ExeTimestamped | Format::DebugAppImage => {}
    }

    builder
        .repeated("--java-options", settings.java_options().for_format(format).iter().cloned())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn settings(root: &Path, icon: Option<PathBuf>) -> Settings {
        SettingsBuilder::new()
            .build_root(root)
            .icon(icon)
            .build()
            .unwrap()
    }

    fn toolset() -> Toolset {
        Toolset::new("/jdk/bin/jpackage", None)
    }

    fn build_for(settings: &Settings, format: Format) -> PackagingInvocation {
        let dest = settings.output_dir(format);
        build_invocation(settings, &toolset(), format, &dest, &settings.temp_dir(format)).unwrap()
    }

    #[test]
    fn icon_flag_present_only_when_icon_exists() {
        let temp = TempDir::new().unwrap();
        let icon = temp.path().join("app.ico");
        let settings = settings(temp.path(), Some(icon.clone()));

        let without = build_for(&settings, Format::AppImage);
        assert!(!without.has_flag("--icon"));

        std::fs::write(&icon, b"ico").unwrap();
        let with = build_for(&settings, Format::AppImage);
        assert_eq!(with.value_of("--icon"), Some(icon.display().to_string().as_str()));
    }

    #[test]
    fn exe_carries_installer_flags_and_extended_options() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path(), None);
        let invocation = build_for(&settings, Format::Exe);

        assert_eq!(invocation.value_of("--type"), Some("exe"));
        assert_eq!(invocation.value_of("--main-jar"), Some("trading-analytics.jar"));
        for switch in ["--win-dir-chooser", "--win-menu", "--win-shortcut", "--win-per-user-install"] {
            assert!(invocation.has_flag(switch), "missing {switch}");
        }
        assert!(invocation.has_flag("--copyright"));
        assert_eq!(invocation.values_of("--java-options").count(), 14);
        assert!(
            invocation
                .value_of("--temp")
                .is_some_and(|t| t.ends_with("jpackage-temp-exe"))
        );
    }

    #[test]
    fn runtime_embedded_installer_uses_runtime_image() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path(), None);
        let invocation = build_for(&settings, Format::ExeWithRuntime);

        assert_eq!(
            invocation.value_of("--runtime-image"),
            Some(settings.runtime_dir().display().to_string().as_str())
        );
        assert!(!invocation.has_flag("--win-per-user-install"));
        assert!(!invocation.has_flag("--java-options"));
    }

    #[test]
    fn debug_image_has_distinct_name_and_minimal_options() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path(), None);
        let invocation = build_for(&settings, Format::DebugAppImage);

        assert_eq!(invocation.value_of("--name"), Some("TradingAnalyticsDebug"));
        assert_eq!(invocation.value_of("--type"), Some("app-image"));
        assert!(!invocation.has_flag("--win-menu"));
        assert_eq!(invocation.values_of("--java-options").count(), 3);
    }
}
