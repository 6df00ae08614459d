//! Windows installer settings.

use serde::Deserialize;

/// Installer integration flags for the EXE and MSI formats.
///
/// # Configuration
///
/// ```toml
/// [windows]
/// dir_chooser = true
/// menu = true
/// shortcut = true
/// per_user_install = true
/// ```
///
/// `per_user_install` applies to the plain EXE and MSI installers only; the
/// runtime-embedded installer always installs machine-wide.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowsSettings {
    /// Let the user choose the installation directory (`--win-dir-chooser`).
    pub dir_chooser: bool,

    /// Add a start menu entry (`--win-menu`).
    pub menu: bool,

    /// Create a desktop shortcut (`--win-shortcut`).
    pub shortcut: bool,

    /// Install for the current user only (`--win-per-user-install`).
    pub per_user_install: bool,
}

impl Default for WindowsSettings {
    fn default() -> Self {
        Self {
            dir_chooser: true,
            menu: true,
            shortcut: true,
            per_user_install: true,
        }
    }
}
