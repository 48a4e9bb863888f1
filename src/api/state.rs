use std::sync::Arc;
use tracing::info;

use crate::compute::{ComputeBackend, ProcessInvoker, ScriptedBackend};
use crate::config::Config;
use crate::service::ComputeService;

pub struct AppState {
    pub service: ComputeService,
    pub expose_data_source: bool,
}

impl AppState {
    pub fn new(config: &Config, backend: Arc<dyn ComputeBackend>) -> Self {
        Self {
            service: ComputeService::new(backend, config.compute.clone(), config.fallback.clone()),
            expose_data_source: config.server.expose_data_source,
        }
    }

    /// Real child processes, or the scripted demo backend in simulation mode.
    pub fn from_config(config: &Config) -> Self {
        let backend: Arc<dyn ComputeBackend> = if config.compute.simulation_mode {
            info!("🎞️  Initializing scripted compute backend (simulation mode)");
            Arc::new(ScriptedBackend::demo(&config.fallback))
        } else {
            info!(
                "🐍 Initializing process invoker ({}, max {} concurrent)",
                config.compute.python_bin, config.compute.max_concurrent
            );
            Arc::new(ProcessInvoker::new(config.compute.max_concurrent))
        };
        Self::new(config, backend)
    }
}
