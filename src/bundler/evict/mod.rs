//! Directory eviction: making sure a directory is gone before packaging
//! writes into it.
//!
//! On a developer workstation the usual reason a previous output directory
//! cannot be deleted is that the previously built application is still
//! running from it. Each round therefore terminates matching processes,
//! clears blocking attributes, and then tries several deletion mechanisms
//! before re-checking. Rounds are bounded and separated by a linear back-off.
//!
//! # Module Organization
//!
//! - [`attempt`] - Records of rounds and the terminal [`EvictionResult`]
//! - [`strategy`] - Platform capabilities ([`ProcessTerminator`], [`AttributeClearer`], [`DirectoryRemover`])
//! - [`clean`] - The clean-known-outputs task

pub mod attempt;
pub mod clean;
pub mod strategy;

pub use attempt::{AttemptOutcome, EvictionAttempt, EvictionResult, EvictionStrategy, remediation};
pub use clean::{CleanEntry, CleanOutcome, CleanSummary, clean_directories};
pub use strategy::{
    AttributeClearer, DirectoryRemover, EvictionStrategies, FallbackRemover, NativeRemover,
    NoopAttributeClearer, NoopTerminator, ProcessTerminator, SystemProcessTerminator,
};

use crate::bundler::settings::EvictionSettings;
use crate::bundler::utils::fs::path_exists;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Guarantees directories are absent, with escalating strategies and
/// bounded retries.
///
/// Eviction terminates processes by name, which is global; callers must not
/// run two evictions concurrently.
#[derive(Debug, Clone)]
pub struct DirectoryEvictor {
    app_name: String,
    strategies: Arc<EvictionStrategies>,
    settings: EvictionSettings,
}

impl DirectoryEvictor {
    /// Creates an evictor.
    ///
    /// # Arguments
    ///
    /// * `app_name` - Executable name prefix of instances to terminate
    /// * `strategies` - Mechanisms applied each round
    /// * `settings` - Attempt budget and pacing
    pub fn new(app_name: impl Into<String>, strategies: EvictionStrategies, settings: EvictionSettings) -> Self {
        Self {
            app_name: app_name.into(),
            strategies: Arc::new(strategies),
            settings,
        }
    }

    /// Configured attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.settings.max_attempts
    }

    /// Application name used by the termination pass.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Evicts `path` using the configured attempt budget.
    pub async fn evict(&self, path: &Path) -> EvictionResult {
        self.evict_with(path, self.settings.max_attempts).await
    }

    /// Evicts `path` with at most `max_attempts` rounds.
    ///
    /// Returns immediately if the path does not exist. Otherwise stops as
    /// soon as a round leaves the path absent; after round `i` (if rounds
    /// remain) sleeps `i * backoff_unit`. Never fails: an exhausted budget
    /// is reported in the result and the caller decides whether it is fatal.
    pub async fn evict_with(&self, path: &Path, max_attempts: u32) -> EvictionResult {
        if !path_exists(path) {
            log::debug!("{} already absent", path.display());
            return EvictionResult::already_absent(path);
        }

        let mut attempts = Vec::new();
        for number in 1..=max_attempts {
            log::info!("Eviction attempt {} of {} for {}", number, max_attempts, path.display());

            let (strategy, outcome) = self.run_round(path.to_path_buf()).await;
            let evicted = outcome == AttemptOutcome::Evicted;
            let waited = if evicted || number == max_attempts {
                Duration::ZERO
            } else {
                backoff(self.settings.backoff_unit, number)
            };

            attempts.push(EvictionAttempt {
                number,
                strategy,
                outcome,
                waited,
            });

            if evicted {
                log::info!("Removed {} on attempt {}", path.display(), number);
                return EvictionResult::finished(path, attempts, true);
            }
            if !waited.is_zero() {
                log::info!("{} still present, waiting {:?}", path.display(), waited);
                tokio::time::sleep(waited).await;
            }
        }

        log::warn!(
            "{} still present after {} attempt(s)",
            path.display(),
            max_attempts
        );
        EvictionResult::finished(path, attempts, false)
    }

    /// Runs one round on the blocking pool.
    async fn run_round(&self, path: PathBuf) -> (EvictionStrategy, AttemptOutcome) {
        let strategies = Arc::clone(&self.strategies);
        let app_name = self.app_name.clone();
        let pause = self.settings.termination_pause;

        tokio::task::spawn_blocking(move || run_round_blocking(&strategies, &app_name, &path, pause))
            .await
            .unwrap_or_else(|e| {
                (
                    EvictionStrategy::DirectDelete,
                    AttemptOutcome::Error(format!("eviction round panicked: {e}")),
                )
            })
    }
}

/// Wait after round `number`: `number * unit`, saturating.
fn backoff(unit: Duration, number: u32) -> Duration {
    unit.checked_mul(number).unwrap_or(Duration::MAX)
}

fn run_round_blocking(
    strategies: &EvictionStrategies,
    app_name: &str,
    path: &Path,
    pause: Duration,
) -> (EvictionStrategy, AttemptOutcome) {
    let mut strategy = EvictionStrategy::DirectDelete;
    let mut last_error = None;

    match strategies.terminator.terminate(app_name, path) {
        Ok(0) => {}
        Ok(count) => {
            strategy = EvictionStrategy::TerminationAssisted;
            log::debug!("Terminated {} process(es), pausing {:?}", count, pause);
            std::thread::sleep(pause);
        }
        Err(e) => {
            log::debug!("Process termination failed: {}", e);
            last_error = Some(e.to_string());
        }
    }

    match strategies.clearer.clear(path) {
        Ok(true) if strategy == EvictionStrategy::DirectDelete => {
            strategy = EvictionStrategy::AttributeClearAssisted;
        }
        Ok(_) => {}
        Err(e) => {
            log::debug!("Attribute clearing failed: {}", e);
            last_error = Some(e.to_string());
        }
    }

    for remover in &strategies.removers {
        if !path_exists(path) {
            break;
        }
        if let Err(e) = remover.remove(path) {
            log::debug!("{} removal of {} failed: {}", remover.name(), path.display(), e);
            last_error = Some(e.to_string());
        }
    }

    let outcome = if !path_exists(path) {
        AttemptOutcome::Evicted
    } else {
        match last_error {
            Some(message) => AttemptOutcome::Error(message),
            None => AttemptOutcome::StillPresent,
        }
    };
    (strategy, outcome)
}
