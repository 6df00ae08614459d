//! Runtime option sets passed through to the packaged launcher.

use super::Format;
use serde::Deserialize;

const HEAP_AND_ENCODING: [&str; 4] = [
    "-Xmx2048m",
    "-Xms512m",
    "-Dfile.encoding=UTF-8",
    "-Djava.awt.headless=false",
];

const FRAMEWORK: [&str; 2] = [
    "-Dspring.aop.proxy-target-class=true",
    "-Dspring.main.web-application-type=none",
];

const BASE_OPENS: [&str; 3] = [
    "--add-opens=java.base/java.lang=ALL-UNNAMED",
    "--add-opens=java.base/java.nio=ALL-UNNAMED",
    "--add-opens=java.base/java.util=ALL-UNNAMED",
];

const UI_OPENS: [&str; 3] = [
    "--add-opens=java.desktop/sun.awt=ALL-UNNAMED",
    "--add-opens=javafx.controls/com.sun.javafx.scene.control=ALL-UNNAMED",
    "--add-opens=javafx.fxml/javafx.fxml=ALL-UNNAMED",
];

/// Option sets appended verbatim as `--java-options` values.
///
/// Each set is a complete list; configuring one replaces its default rather
/// than extending it.
///
/// # Configuration
///
/// ```toml
/// [java_options]
/// minimal = ["-Xmx1024m", "-Dfile.encoding=UTF-8"]
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct JavaOptions {
    /// Portable image and MSI installer.
    pub standard: Vec<String>,

    /// EXE installer: standard plus concurrency and 2D pipeline grants.
    pub extended: Vec<String>,

    /// Timestamp-isolated installer.
    pub safe: Vec<String>,

    /// Debug image.
    pub minimal: Vec<String>,

    /// Runtime-embedded installer.
    pub runtime: Vec<String>,
}

impl Default for JavaOptions {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut standard = owned(&HEAP_AND_ENCODING);
        standard.extend(owned(&FRAMEWORK));
        standard.extend(owned(&BASE_OPENS));
        standard.extend(owned(&UI_OPENS));

        let mut extended = owned(&HEAP_AND_ENCODING);
        extended.extend(owned(&FRAMEWORK));
        extended.extend(owned(&BASE_OPENS));
        extended.push("--add-opens=java.base/java.util.concurrent=ALL-UNNAMED".into());
        extended.push(UI_OPENS[0].into());
        extended.push("--add-opens=java.desktop/sun.java2d=ALL-UNNAMED".into());
        extended.extend(owned(&UI_OPENS[1..]));

        let mut safe = owned(&HEAP_AND_ENCODING);
        safe.push(FRAMEWORK[0].into());

        let minimal = owned(&[
            "-Xmx1024m",
            "-Dfile.encoding=UTF-8",
            "-Djava.awt.headless=false",
        ]);

        Self {
            standard,
            extended,
            safe,
            minimal,
            runtime: Vec::new(),
        }
    }
}

impl JavaOptions {
    /// Option set used by the given format.
    pub fn for_format(&self, format: Format) -> &[String] {
        match format {
            Format::AppImage | Format::Msi => &self.standard,
            Format::Exe => &self.extended,
            Format::ExeTimestamped => &self.safe,
            Format::DebugAppImage => &self.minimal,
            Format::ExeWithRuntime => &self.runtime,
        }
    }
}
