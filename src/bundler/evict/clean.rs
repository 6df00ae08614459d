//! Removal of every known output directory.

use super::{DirectoryEvictor, remediation};
use crate::cli::OutputManager;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to one directory during a clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum CleanOutcome {
    /// Nothing to remove.
    AlreadyAbsent,
    /// Removed.
    Evicted { attempts: u32 },
    /// Still present after the full attempt budget.
    Failed { attempts: u32 },
}

/// One cleaned directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanEntry {
    pub path: PathBuf,
    pub outcome: CleanOutcome,
}

/// Per-directory results of a clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    entries: Vec<CleanEntry>,
}

impl CleanSummary {
    pub fn entries(&self) -> &[CleanEntry] {
        &self.entries
    }

    /// Directories that could not be removed.
    pub fn failed(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match e.outcome {
            CleanOutcome::Failed { .. } => Some(e.path.as_path()),
            _ => None,
        })
    }

    /// Number of directories actually removed.
    pub fn removed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CleanOutcome::Evicted { .. }))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failed().count();
        write!(
            f,
            "{} removed, {} already absent, {} failed",
            self.removed_count(),
            self.entries.len() - self.removed_count() - failed,
            failed
        )
    }
}

/// Evicts every directory in `dirs`, in order.
///
/// A failure on one directory is reported and the clean moves on to the
/// next; the summary carries the per-directory results.
pub async fn clean_directories(
    evictor: &DirectoryEvictor,
    dirs: &[PathBuf],
    output: &OutputManager,
) -> CleanSummary {
    let mut summary = CleanSummary::default();

    for dir in dirs {
        let result = evictor.evict(dir).await;
        let outcome = match (result.is_evicted(), result.attempt_count()) {
            (true, 0) => {
                output.detail(&format!("{} (absent)", dir.display()));
                CleanOutcome::AlreadyAbsent
            }
            (true, attempts) => {
                output.indent(&format!("Removed {}", dir.display()));
                CleanOutcome::Evicted { attempts }
            }
            (false, attempts) => {
                output.warn(&result.to_string());
                output.warn(&remediation(dir, evictor.app_name()));
                CleanOutcome::Failed { attempts }
            }
        };
        summary.entries.push(CleanEntry {
            path: dir.clone(),
            outcome,
        });
    }

    log::info!("Clean finished: {}", summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::{Error, Result};
    use crate::bundler::evict::{
        DirectoryRemover, EvictionStrategies, NoopAttributeClearer, NoopTerminator,
    };
    use crate::bundler::settings::EvictionSettings;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Refuses to delete one specific directory.
    struct StubbornRemover {
        stubborn: PathBuf,
    }

    impl DirectoryRemover for StubbornRemover {
        fn name(&self) -> &'static str {
            "stubborn"
        }

        fn remove(&self, dir: &Path) -> Result<()> {
            if dir == self.stubborn {
                return Err(Error::GenericError("access denied".into()));
            }
            crate::bundler::utils::fs::remove_dir_all(dir)
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_clean() {
        let temp = TempDir::new().unwrap();
        let portable = temp.path().join("portable");
        let installer = temp.path().join("installer");
        let msi = temp.path().join("installer-msi");
        std::fs::create_dir_all(portable.join("TradingAnalytics")).unwrap();
        std::fs::create_dir_all(installer.join("locked")).unwrap();

        let strategies = EvictionStrategies {
            terminator: Arc::new(NoopTerminator),
            clearer: Arc::new(NoopAttributeClearer),
            removers: vec![Arc::new(StubbornRemover {
                stubborn: installer.clone(),
            })],
        };
        let settings = EvictionSettings {
            max_attempts: 2,
            backoff_unit: Duration::from_millis(1),
            termination_pause: Duration::ZERO,
            terminate_instances: false,
        };
        let evictor = DirectoryEvictor::new("TradingAnalytics", strategies, settings);
        let output = OutputManager::new(false, true);

        let dirs = vec![installer.clone(), portable.clone(), msi.clone()];
        let summary = clean_directories(&evictor, &dirs, &output).await;

        assert_eq!(summary.entries().len(), 3);
        assert_eq!(summary.entries()[0].outcome, CleanOutcome::Failed { attempts: 2 });
        assert_eq!(summary.entries()[1].outcome, CleanOutcome::Evicted { attempts: 1 });
        assert_eq!(summary.entries()[2].outcome, CleanOutcome::AlreadyAbsent);
        assert!(!summary.is_success());
        assert_eq!(summary.failed().collect::<Vec<_>>(), vec![installer.as_path()]);
        assert!(!portable.exists());
        assert_eq!(summary.to_string(), "1 removed, 1 already absent, 1 failed");
    }
}
