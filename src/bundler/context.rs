//! Shared state handed to every task of a pipeline run.

use crate::bundler::evict::{DirectoryEvictor, EvictionStrategies};
use crate::bundler::platform::jpackage::Toolset;
use crate::bundler::settings::Settings;
use crate::bundler::utils::process::ProcessRunner;
use crate::cli::OutputManager;

/// Settings, resolved tools and services used by the tasks.
#[derive(Debug, Clone)]
pub struct TaskContext {
    settings: Settings,
    toolset: Toolset,
    evictor: DirectoryEvictor,
    runner: ProcessRunner,
    output: OutputManager,
}

impl TaskContext {
    /// Creates a context with the eviction strategies of the current host.
    pub fn new(settings: Settings, toolset: Toolset, output: OutputManager) -> Self {
        let eviction = *settings.eviction();
        let evictor = DirectoryEvictor::new(
            settings.app_name(),
            EvictionStrategies::for_host(eviction.terminate_instances),
            eviction,
        );
        let runner = ProcessRunner::new(settings.process_timeout(), output.clone());
        Self {
            settings,
            toolset,
            evictor,
            runner,
            output,
        }
    }

    /// Replaces the evictor.
    pub fn with_evictor(mut self, evictor: DirectoryEvictor) -> Self {
        self.evictor = evictor;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn toolset(&self) -> &Toolset {
        &self.toolset
    }

    pub fn evictor(&self) -> &DirectoryEvictor {
        &self.evictor
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }
}
