//! Application state for the web server.

use quill_orchestrator::{Orchestrator, QuillConfig};
use std::sync::Arc;

/// Shared application state for the web server.
pub struct AppState {
    /// Built once at startup and shared by every request
    pub orchestrator: Arc<Orchestrator>,

    /// Server start time (for health checks)
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build the production pipeline from configuration.
    pub fn from_config(config: &QuillConfig) -> quill_common::Result<Self> {
        Ok(Self::new(Orchestrator::from_config(config)?))
    }

    /// Get the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
