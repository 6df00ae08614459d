//! Platform capabilities used by the evictor.
//!
//! Each mechanism is a trait with a no-op implementation for platforms that
//! lack the concept. [`EvictionStrategies::for_host`] picks the set once at
//! startup so no eviction code branches on the platform.

use crate::bundler::error::{Error, Result};
use crate::bundler::utils::{fs, process::run_blocking};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for each OS helper command (taskkill, rmdir, attrib, rm).
const HELPER_TIMEOUT: Duration = Duration::from_secs(60);

/// Terminates processes that may hold files open inside a directory.
pub trait ProcessTerminator: Send + Sync {
    /// Terminates processes whose executable name starts with `app_name`
    /// or whose executable lives under `dir`. Returns how many were
    /// terminated; finding none is not an error.
    fn terminate(&self, app_name: &str, dir: &Path) -> Result<usize>;
}

/// Clears attributes that block deletion.
pub trait AttributeClearer: Send + Sync {
    /// Clears attributes below `dir`. Returns whether anything was attempted.
    fn clear(&self, dir: &Path) -> Result<bool>;
}

/// One way of recursively deleting a directory.
pub trait DirectoryRemover: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Attempts removal. Success means the mechanism ran, not that the
    /// directory is gone; the evictor re-checks existence itself.
    fn remove(&self, dir: &Path) -> Result<()>;
}

/// Terminator for platforms where running programs do not lock their files.
#[derive(Debug, Default)]
pub struct NoopTerminator;

impl ProcessTerminator for NoopTerminator {
    fn terminate(&self, _app_name: &str, _dir: &Path) -> Result<usize> {
        Ok(0)
    }
}

/// Terminates matching processes through the system process table.
#[derive(Debug, Default)]
pub struct SystemProcessTerminator;

impl ProcessTerminator for SystemProcessTerminator {
    fn terminate(&self, app_name: &str, dir: &Path) -> Result<usize> {
        use sysinfo::{ProcessesToUpdate, System};

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        let own_pid = sysinfo::get_current_pid().ok();
        let prefix = app_name.to_lowercase();

        let mut terminated = 0;
        for (pid, process) in system.processes() {
            if Some(*pid) == own_pid {
                continue;
            }
            let name_matches = process
                .name()
                .to_string_lossy()
                .to_lowercase()
                .starts_with(&prefix);
            let inside_dir = process.exe().is_some_and(|exe| exe.starts_with(dir));
            if !(name_matches || inside_dir) {
                continue;
            }

            if process.kill() {
                log::info!(
                    "Terminated {} (pid {}) holding {}",
                    process.name().to_string_lossy(),
                    pid,
                    dir.display()
                );
                terminated += 1;
            } else {
                // Usually already exited between refresh and kill
                log::debug!("Could not terminate pid {}", pid);
            }
        }
        Ok(terminated)
    }
}

/// Clearer for platforms without deletion-blocking attributes.
#[derive(Debug, Default)]
pub struct NoopAttributeClearer;

impl AttributeClearer for NoopAttributeClearer {
    fn clear(&self, _dir: &Path) -> Result<bool> {
        Ok(false)
    }
}

/// Resets every entry below a directory to `FILE_ATTRIBUTE_NORMAL`,
/// dropping read-only, hidden and system flags.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct WindowsAttributeClearer;

#[cfg(windows)]
impl AttributeClearer for WindowsAttributeClearer {
    fn clear(&self, dir: &Path) -> Result<bool> {
        use windows::Win32::Storage::FileSystem::{FILE_ATTRIBUTE_NORMAL, SetFileAttributesW};
        use windows::core::HSTRING;

        let mut failures = 0usize;
        for entry in walkdir::WalkDir::new(dir).follow_links(false) {
            let Ok(entry) = entry else {
                failures += 1;
                continue;
            };
            let wide = HSTRING::from(entry.path());
            // SAFETY: `wide` is a valid NUL-terminated path that outlives the call
            if unsafe { SetFileAttributesW(&wide, FILE_ATTRIBUTE_NORMAL) }.is_err() {
                failures += 1;
            }
        }
        if failures > 0 {
            log::debug!(
                "Could not reset attributes on {} entries below {}",
                failures,
                dir.display()
            );
        }
        Ok(true)
    }
}

/// OS-native bulk removal (`rmdir /s /q` on Windows, `rm -rf` elsewhere).
#[derive(Debug)]
pub struct NativeRemover {
    timeout: Duration,
}

impl Default for NativeRemover {
    fn default() -> Self {
        Self {
            timeout: HELPER_TIMEOUT,
        }
    }
}

impl DirectoryRemover for NativeRemover {
    fn name(&self) -> &'static str {
        "native"
    }

    fn remove(&self, dir: &Path) -> Result<()> {
        let mut command = if cfg!(windows) {
            let mut command = std::process::Command::new("cmd");
            command.args(["/c", "rmdir", "/s", "/q"]).arg(dir);
            command
        } else {
            let mut command = std::process::Command::new("rm");
            command.arg("-rf").arg(dir);
            command
        };

        match run_blocking(&mut command, self.timeout) {
            Ok(Some(status)) if status.success() => Ok(()),
            Ok(Some(status)) => {
                // Tolerated: the fallback delete and existence check follow
                log::warn!(
                    "Native removal of {} exited with {:?}",
                    dir.display(),
                    status.code()
                );
                Ok(())
            }
            Ok(None) => Err(Error::GenericError(format!(
                "native removal of {} timed out after {}s",
                dir.display(),
                self.timeout.as_secs()
            ))),
            Err(error) => Err(Error::CommandFailed {
                command: format!("{command:?}"),
                error,
            }),
        }
    }
}

/// Recursive delete through the standard library.
#[derive(Debug, Default)]
pub struct FallbackRemover;

impl DirectoryRemover for FallbackRemover {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn remove(&self, dir: &Path) -> Result<()> {
        fs::remove_dir_all(dir)
    }
}

/// The mechanisms applied in every eviction round.
#[derive(Clone)]
pub struct EvictionStrategies {
    /// Applied first, followed by a pause if it terminated anything.
    pub terminator: Arc<dyn ProcessTerminator>,
    /// Applied second.
    pub clearer: Arc<dyn AttributeClearer>,
    /// Applied in order, each only while the directory still exists.
    pub removers: Vec<Arc<dyn DirectoryRemover>>,
}

impl EvictionStrategies {
    /// Strategies for the current platform.
    ///
    /// `terminate_instances` enables the process-termination pass; callers
    /// normally pass [`EvictionSettings::terminate_instances`](crate::bundler::EvictionSettings).
    pub fn for_host(terminate_instances: bool) -> Self {
        let terminator: Arc<dyn ProcessTerminator> = if terminate_instances {
            Arc::new(SystemProcessTerminator)
        } else {
            Arc::new(NoopTerminator)
        };

        #[cfg(windows)]
        let clearer: Arc<dyn AttributeClearer> = Arc::new(WindowsAttributeClearer);
        #[cfg(not(windows))]
        let clearer: Arc<dyn AttributeClearer> = Arc::new(NoopAttributeClearer);

        Self {
            terminator,
            clearer,
            removers: vec![Arc::new(NativeRemover::default()), Arc::new(FallbackRemover)],
        }
    }
}

impl std::fmt::Debug for EvictionStrategies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let removers: Vec<_> = self.removers.iter().map(|r| r.name()).collect();
        f.debug_struct("EvictionStrategies")
            .field("removers", &removers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn noop_capabilities_report_nothing_done() {
        let temp = TempDir::new().unwrap();
        assert_eq!(NoopTerminator.terminate("App", temp.path()).unwrap(), 0);
        assert!(!NoopAttributeClearer.clear(temp.path()).unwrap());
    }

    #[test]
    fn native_remover_deletes_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("installer");
        std::fs::create_dir_all(dir.join("app/runtime")).unwrap();
        std::fs::write(dir.join("app/runtime/lib.bin"), b"data").unwrap();

        NativeRemover::default().remove(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn terminator_ignores_unmatched_processes() {
        let temp = TempDir::new().unwrap();
        let terminated = SystemProcessTerminator
            .terminate("NoSuchApplicationNameXyz", temp.path())
            .unwrap();
        assert_eq!(terminated, 0);
    }
}
