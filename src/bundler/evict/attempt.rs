//! Records of eviction rounds.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The most escalated mechanism that took part in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionStrategy {
    /// Only deletion was attempted.
    DirectDelete,
    /// Read-only/hidden/system attributes were cleared before deletion.
    AttributeClearAssisted,
    /// Running instances were terminated before deletion.
    TerminationAssisted,
}

/// State of the directory after a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// The directory is gone.
    Evicted,
    /// The directory survived and no mechanism reported an error.
    StillPresent,
    /// The directory survived; the last error reported by a mechanism.
    Error(String),
}

/// One eviction round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvictionAttempt {
    /// 1-based round number.
    pub number: u32,
    /// Mechanism used.
    pub strategy: EvictionStrategy,
    /// Directory state afterwards.
    pub outcome: AttemptOutcome,
    /// Back-off slept after this round (zero for the final round).
    pub waited: Duration,
}

/// Terminal result of evicting one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvictionResult {
    path: PathBuf,
    attempts: Vec<EvictionAttempt>,
    evicted: bool,
}

impl EvictionResult {
    /// The path was already absent; nothing was attempted.
    pub fn already_absent(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            attempts: Vec::new(),
            evicted: true,
        }
    }

    pub(super) fn finished(path: &Path, attempts: Vec<EvictionAttempt>, evicted: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            attempts,
            evicted,
        }
    }

    /// Evicted path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path is now absent.
    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    /// Rounds performed (zero when the path was already absent).
    pub fn attempt_count(&self) -> u32 {
        self.attempts.len() as u32
    }

    /// Every round, in order.
    pub fn attempts(&self) -> &[EvictionAttempt] {
        &self.attempts
    }

    /// Outcome of the final round, if any round ran.
    pub fn last_outcome(&self) -> Option<&AttemptOutcome> {
        self.attempts.last().map(|a| &a.outcome)
    }

    /// Total back-off time slept between rounds.
    pub fn total_wait(&self) -> Duration {
        self.attempts.iter().map(|a| a.waited).sum()
    }
}

impl fmt::Display for EvictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.evicted, self.attempts.len()) {
            (true, 0) => write!(f, "{} already absent", self.path.display()),
            (true, n) => write!(f, "{} removed after {n} attempt(s)", self.path.display()),
            (false, n) => {
                write!(f, "{} still present after {n} attempt(s)", self.path.display())?;
                if let Some(AttemptOutcome::Error(message)) = self.last_outcome() {
                    write!(f, " (last error: {message})")?;
                }
                Ok(())
            }
        }
    }
}

/// Operator guidance for a directory that could not be evicted.
pub fn remediation(path: &Path, app_name: &str) -> String {
    format!(
        "Could not clear {}.\n\
         \n\
         Try:\n\
         • Close every running instance of {app_name}\n\
         • End leftover {app_name} processes in the task manager\n\
         • Run `fxpack clean-outputs`, then retry\n\
         • Use `fxpack build-safe` to write to a fresh timestamped directory\n\
         • Reboot if the files stay locked",
        path.display()
    )
}
