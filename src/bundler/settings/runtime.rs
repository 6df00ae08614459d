//! Runtime image (jlink) settings.

use serde::Deserialize;

/// Settings for the pruned runtime image embedded by the
/// `exe-with-runtime` format.
///
/// # Configuration
///
/// ```toml
/// [runtime_image]
/// modules = ["java.base", "java.desktop"]
/// compress = "2"
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeImageSettings {
    /// Modules kept in the image (`--add-modules`).
    pub modules: Vec<String>,

    /// Compression level (`--compress`).
    pub compress: String,

    /// Pass `--no-header-files`.
    pub no_header_files: bool,

    /// Pass `--no-man-pages`.
    pub no_man_pages: bool,
}

impl Default for RuntimeImageSettings {
    fn default() -> Self {
        Self {
            modules: [
                "java.base",
                "java.desktop",
                "java.logging",
                "java.xml",
                "java.sql",
                "java.naming",
                "java.security.jgss",
                "java.instrument",
                "java.management",
                "jdk.unsupported",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            compress: "2".into(),
            no_header_files: true,
            no_man_pages: true,
        }
    }
}
