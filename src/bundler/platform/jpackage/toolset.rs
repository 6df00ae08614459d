//! Location of the JDK packaging tools.
//!
//! Each tool is resolved in order from an explicit path, `<java_home>/bin`,
//! `$JAVA_HOME/bin` and finally `PATH`.

use crate::bundler::error::{Error, Result};
use crate::bundler::settings::ToolSettings;
use std::path::{Path, PathBuf};

/// Resolved tool executables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolset {
    jpackage: PathBuf,
    jlink: Option<PathBuf>,
}

impl Toolset {
    /// Creates a toolset from known paths.
    pub fn new(jpackage: impl Into<PathBuf>, jlink: Option<PathBuf>) -> Self {
        Self {
            jpackage: jpackage.into(),
            jlink,
        }
    }

    /// Resolves the tools using `JAVA_HOME` from the environment.
    ///
    /// # Errors
    ///
    /// [`Error::ToolNotFound`] if the packaging tool cannot be found. A
    /// missing runtime builder is not an error here; only the runtime-image
    /// target needs it.
    pub fn resolve(tools: &ToolSettings) -> Result<Self> {
        let env_home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
        Self::resolve_with(tools, env_home.as_deref())
    }

    /// Resolves the tools with an explicit `JAVA_HOME` value.
    pub fn resolve_with(tools: &ToolSettings, env_java_home: Option<&Path>) -> Result<Self> {
        let homes: Vec<&Path> = tools
            .java_home
            .as_deref()
            .into_iter()
            .chain(env_java_home)
            .collect();

        let jpackage = locate("jpackage", tools.jpackage.as_deref(), &homes).ok_or_else(|| {
            Error::ToolNotFound {
                tool: "jpackage".into(),
                hint: "install JDK 14 or newer and set JAVA_HOME, or pass --jpackage".into(),
            }
        })?;
        let jlink = locate("jlink", tools.jlink.as_deref(), &homes);

        log::debug!("Using jpackage at {}", jpackage.display());
        match &jlink {
            Some(path) => log::debug!("Using jlink at {}", path.display()),
            None => log::debug!("jlink not found; runtime image builds will fail"),
        }

        Ok(Self { jpackage, jlink })
    }

    /// Packaging tool executable.
    pub fn jpackage(&self) -> &Path {
        &self.jpackage
    }

    /// Runtime builder executable.
    ///
    /// # Errors
    ///
    /// [`Error::ToolNotFound`] if it was not found during resolution.
    pub fn jlink(&self) -> Result<&Path> {
        self.jlink.as_deref().ok_or_else(|| Error::ToolNotFound {
            tool: "jlink".into(),
            hint: "install a full JDK and set JAVA_HOME, or pass --jlink".into(),
        })
    }
}

fn locate(tool: &str, explicit: Option<&Path>, homes: &[&Path]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        // An explicit path is used as given; a missing file surfaces as a spawn error
        return Some(path.to_path_buf());
    }

    let file_name = if cfg!(windows) {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    };
    for home in homes {
        let candidate = home.join("bin").join(&file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        log::debug!("{} not found under {}", tool, home.display());
    }

    which::which(tool).ok()
}
