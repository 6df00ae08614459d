//! Error types for packaging operations.
//!
//! Task-level failures (a packaging tool exiting nonzero, a missing artifact)
//! are not errors in this sense: they are recorded as
//! [`TaskResult`](crate::bundler::TaskResult) values. [`Error`] covers the
//! problems that stop a step from being attempted at all.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the packaging library.
#[derive(Debug, Error)]
pub enum Error {
    /// Free-form error, usually produced by [`bail!`](crate::bail).
    #[error("{0}")]
    GenericError(String),

    /// Bare IO error without path information.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// IO error annotated with what was being done and to which path.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being attempted
        context: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// An external command could not be spawned or awaited.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line (program and arguments)
        command: String,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// A tool invocation failed validation before it was serialized.
    #[error("invalid invocation of {tool}: {reason}")]
    InvalidInvocation {
        /// Tool the invocation was built for
        tool: String,
        /// What is wrong with it
        reason: String,
    },

    /// An external tool could not be located.
    #[error("{tool} not found: {hint}")]
    ToolNotFound {
        /// Tool name (e.g. `jpackage`)
        tool: String,
        /// How to make the tool available
        hint: String,
    },

    /// A requested target is not declared in the target graph.
    #[error("unknown target `{0}` (run with --list to see available targets)")]
    UnknownTarget(String),

    /// The target graph contains a dependency cycle.
    #[error("target graph contains a cycle through `{0}`")]
    CyclicTarget(String),

    /// Configuration values that cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Directory traversal error.
    #[error("directory traversal failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Invalid glob pattern during artifact discovery.
    #[error("invalid artifact pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Error wrapped with a higher-level description.
    #[error("{context}: {source}")]
    Context {
        /// Higher-level description
        context: String,
        /// Wrapped error
        #[source]
        source: Box<Error>,
    },
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Convert an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Wrap errors with a higher-level description.
pub trait Context<T> {
    /// Wrap the error (if any) in [`Error::Context`].
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: context.to_string(),
            source: Box::new(source),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Return early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "locked",
        ));
        let err = io.fs_context("removing output directory", "/tmp/out").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("removing output directory"));
        assert!(message.contains("/tmp/out"));
        assert!(message.contains("locked"));
    }

    #[test]
    fn context_wraps_source() {
        fn fails() -> Result<()> {
            crate::bail!("tool exited with {}", 3);
        }
        let err = fails().context("building runtime image").unwrap_err();
        assert_eq!(err.to_string(), "building runtime image: tool exited with 3");
    }
}
