//! Package metadata settings.

use serde::Deserialize;

/// Application metadata passed to the packaging tool.
///
/// # Configuration
///
/// ```toml
/// [package]
/// name = "TradingAnalytics"
/// main_class = "com.example.ta.TradingAnalyticsApplication"
/// version = "1.0.0"
/// vendor = "TradingAnalytics"
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    /// Application name, also the launcher and installer base name.
    pub name: String,

    /// Fully qualified main entry point identifier.
    pub main_class: String,

    /// Version string (`--app-version`), 1 to 3 numeric components.
    pub version: String,

    /// Vendor string.
    pub vendor: String,

    /// Copyright line, used by installer formats.
    pub copyright: Option<String>,

    /// Short description, used by installer formats.
    pub description: Option<String>,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            name: "TradingAnalytics".into(),
            main_class: "com.example.ta.TradingAnalyticsApplication".into(),
            version: "1.0.0".into(),
            vendor: "TradingAnalytics".into(),
            copyright: Some("Copyright 2024 TradingAnalytics".into()),
            description: Some("Trading Analytics Application".into()),
        }
    }
}
