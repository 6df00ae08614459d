//! Command line argument parsing and validation.

use crate::bundler::utils::fs::absolute;
use crate::metadata::Manifest;
use clap::Parser;
use std::path::PathBuf;

/// Release packaging for desktop Java applications
#[derive(Parser, Debug)]
#[command(
    name = "fxpack",
    version,
    about = "Packages a Java application archive into portable images and Windows installers",
    long_about = "Packages a Java application archive into portable images and Windows installers.

Runs the JDK packaging tools for each requested target, first clearing output
directories that running instances of the application may still hold open.

Usage:
  fxpack build-all
  fxpack --bundle build/libs/app.jar build-portable build-debug
  fxpack clean-and-build-all --report-json build/report.json
  fxpack --list

Exit code 0 = every task succeeded."
)]
pub struct Args {
    /// Targets to run (see --list)
    #[arg(value_name = "TARGET", required_unless_present = "list")]
    pub targets: Vec<String>,

    /// List available targets and exit
    #[arg(long)]
    pub list: bool,

    /// Path to the manifest (default: ./fxpack.toml if present)
    #[arg(short, long, value_name = "PATH", env = "FXPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of all output and temp directories
    #[arg(long, value_name = "DIR", env = "FXPACK_BUILD_ROOT")]
    pub build_root: Option<PathBuf>,

    /// Application archive to package
    #[arg(long, value_name = "PATH")]
    pub bundle: Option<PathBuf>,

    /// JDK installation used to find jpackage and jlink
    #[arg(long, value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Explicit jpackage executable
    #[arg(long, value_name = "PATH", env = "FXPACK_JPACKAGE")]
    pub jpackage: Option<PathBuf>,

    /// Explicit jlink executable
    #[arg(long, value_name = "PATH")]
    pub jlink: Option<PathBuf>,

    /// Eviction attempts per directory
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Timeout for each tool invocation, in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Write the pipeline report as JSON
    #[arg(long, value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Show tool output and debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Applies command line overrides on top of the manifest.
    ///
    /// Paths given on the command line are relative to the current
    /// directory, not to the manifest.
    pub fn apply_overrides(&self, manifest: &mut Manifest) {
        let cwd_relative = |path: &PathBuf| absolute(path).unwrap_or_else(|_| path.clone());

        if let Some(dir) = &self.build_root {
            manifest.paths.build_root = Some(cwd_relative(dir));
        }
        if let Some(bundle) = &self.bundle {
            manifest.paths.bundle = Some(cwd_relative(bundle));
        }
        if let Some(home) = &self.java_home {
            manifest.tools.java_home = Some(cwd_relative(home));
        }
        if let Some(jpackage) = &self.jpackage {
            manifest.tools.jpackage = Some(cwd_relative(jpackage));
        }
        if let Some(jlink) = &self.jlink {
            manifest.tools.jlink = Some(cwd_relative(jlink));
        }
        if let Some(attempts) = self.max_attempts {
            manifest.eviction.max_attempts = Some(attempts);
        }
        if let Some(secs) = self.timeout_secs {
            manifest.process.timeout_secs = Some(secs);
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
