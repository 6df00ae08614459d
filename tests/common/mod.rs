//! Shared fixtures: a fake JDK tool and a project layout in a temp directory.
#![allow(dead_code)]

use fxpack::bundler::evict::{
    DirectoryRemover, NoopAttributeClearer, ProcessTerminator,
};
use fxpack::bundler::{
    DirectoryEvictor, Error, EvictionSettings, EvictionStrategies, Result, Settings,
    SettingsBuilder, TaskContext, Toolset,
};
use fxpack::cli::OutputManager;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tempfile::TempDir;

/// Stands in for both jpackage and jlink.
///
/// Behaviour is chosen by `<build root>/fake-mode`, and every call is
/// appended to `<build root>/invocations.log`.
const FAKE_TOOL: &str = r#"#!/bin/sh
dest=""; type=""; name=""; out=""; prev=""
for arg in "$@"; do
  case "$prev" in
    --dest) dest="$arg" ;;
    --type) type="$arg" ;;
    --name) name="$arg" ;;
    --output) out="$arg" ;;
  esac
  prev="$arg"
done
if [ -n "$out" ]; then root=$(dirname "$out"); else root=$(dirname "$dest"); fi
echo "$*" >> "$root/invocations.log"
mode=$(cat "$root/fake-mode" 2>/dev/null || echo ok)

if [ -n "$out" ]; then
  if [ "$mode" = "fail-jlink" ]; then echo "Error: module not found: javafx.base" >&2; exit 1; fi
  mkdir -p "$out/bin" && echo runtime > "$out/bin/java"
  exit 0
fi

case "$mode" in
  fail) echo "Error: simulated packaging failure" >&2; exit 2 ;;
  fail-msi) if [ "$type" = "msi" ]; then echo "Error: WiX tools not found" >&2; exit 1; fi ;;
  no-artifact) echo "nothing written"; exit 0 ;;
  hang) sleep 30 ;;
esac

case "$type" in
  app-image) mkdir -p "$dest/$name/app" && echo jar > "$dest/$name/app/app.jar" ;;
  *) echo installer > "$dest/$name-1.0.0.$type" ;;
esac
echo "Packaged $name"
"#;

/// Path of the fake tool, written once per test process before any test
/// spawns it.
pub fn fake_tool() -> &'static Path {
    static TOOL: OnceLock<PathBuf> = OnceLock::new();
    TOOL.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("fxpack-fake-jdk-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fake-tool");
        std::fs::write(&path, FAKE_TOOL).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}

/// A build root with the application archive in place.
pub struct Project {
    pub temp: TempDir,
}

impl Project {
    pub fn new() -> Self {
        // Resolve the tool before creating anything else
        fake_tool();
        let temp = TempDir::new().unwrap();
        let libs = temp.path().join("libs");
        std::fs::create_dir_all(&libs).unwrap();
        std::fs::write(libs.join("trading-analytics.jar"), b"PK\x03\x04").unwrap();
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn set_mode(&self, mode: &str) {
        std::fs::write(self.root().join("fake-mode"), mode).unwrap();
    }

    pub fn remove_bundle(&self) {
        std::fs::remove_file(self.root().join("libs/trading-analytics.jar")).unwrap();
    }

    /// Recorded tool invocations, one line each.
    pub fn invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.root().join("invocations.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn settings(&self, icon: Option<PathBuf>) -> Settings {
        SettingsBuilder::new()
            .build_root(self.root())
            .icon(icon)
            .eviction(EvictionSettings {
                max_attempts: 2,
                backoff_unit: Duration::from_millis(1),
                termination_pause: Duration::ZERO,
                terminate_instances: false,
            })
            .process_timeout(Duration::from_secs(60))
            .build()
            .unwrap()
    }

    pub fn context(&self, settings: Settings) -> TaskContext {
        let tool = fake_tool().to_path_buf();
        TaskContext::new(
            settings,
            Toolset::new(tool.clone(), Some(tool)),
            OutputManager::new(false, true),
        )
    }
}

/// Counts termination passes without touching any process.
#[derive(Default)]
pub struct CountingTerminator {
    pub calls: AtomicU32,
}

impl ProcessTerminator for CountingTerminator {
    fn terminate(&self, _app_name: &str, _dir: &Path) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

/// Counts removals; refuses every one when `locked`, as if a running
/// instance held the files open.
#[derive(Default)]
pub struct RecordingRemover {
    pub locked: bool,
    pub calls: AtomicU32,
}

impl DirectoryRemover for RecordingRemover {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn remove(&self, dir: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.locked {
            return Err(Error::GenericError(format!("{} is in use", dir.display())));
        }
        std::fs::remove_dir_all(dir).map_err(Error::from)
    }
}

/// Context whose evictor applies only the given terminator and remover.
pub fn context_with_evictor(
    project: &Project,
    terminator: Arc<CountingTerminator>,
    remover: Arc<RecordingRemover>,
) -> TaskContext {
    let settings = project.settings(None);
    let evictor = DirectoryEvictor::new(
        settings.app_name(),
        EvictionStrategies {
            terminator,
            clearer: Arc::new(NoopAttributeClearer),
            removers: vec![remover as Arc<dyn DirectoryRemover>],
        },
        *settings.eviction(),
    );
    project.context(settings).with_evictor(evictor)
}
