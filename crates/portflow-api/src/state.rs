//! # Application State
//!
//! Shared state handed to every handler. The registry is the single source
//! of truth; handlers receive clone-out snapshots from it.

use std::sync::Arc;

use portflow_clearance::ContainerRegistry;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ContainerRegistry>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            registry: Arc::new(ContainerRegistry::new()),
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
