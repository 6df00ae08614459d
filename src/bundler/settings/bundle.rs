//! The upstream application bundle consumed by every packaging task.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Immutable reference to the built application archive.
///
/// Produced once by the upstream build; packaging only reads its path,
/// containing directory and file name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactBundle {
    path: PathBuf,
    name: String,
    version: String,
}

impl ArtifactBundle {
    /// Creates a bundle reference.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Path to the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Logical application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Application version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory containing the archive, passed as the tool's input directory.
    pub fn input_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Archive file name, passed as the tool's main archive.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Whether the archive is present as a regular file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
