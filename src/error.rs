//! Error types at the command-line boundary.
//!
//! Library failures arrive as [`crate::bundler::Error`]; this module wraps
//! them together with argument, configuration and report-writing errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for command-line operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging library errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Errors carrying ad hoc context, such as report writing
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration file could not be read
    #[error("Cannot read configuration {}: {reason}", path.display())]
    ConfigUnreadable {
        /// Configuration path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl PipelineError {
    /// Actionable hints printed after the error message
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as BundlerError;

        match self {
            PipelineError::Bundler(BundlerError::ToolNotFound { .. }) => vec![
                "Install JDK 14 or newer (jpackage ships with the JDK)".to_string(),
                "Set JAVA_HOME or java_home in fxpack.toml".to_string(),
            ],
            PipelineError::Bundler(BundlerError::UnknownTarget(_)) => {
                vec!["Run `fxpack --list` to see available targets".to_string()]
            }
            PipelineError::Bundler(BundlerError::Config(_)) | PipelineError::Toml(_) => {
                vec!["Check fxpack.toml against fxpack.example.toml".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_suggests_listing() {
        let err = PipelineError::from(crate::bundler::Error::UnknownTarget("build-deb".into()));
        assert!(err.to_string().contains("build-deb"));
        assert_eq!(err.recovery_suggestions().len(), 1);
    }
}
