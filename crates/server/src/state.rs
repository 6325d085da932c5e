//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::InsuredService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the registry
/// service and the configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    service: InsuredService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, service: InsuredService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, service }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the registry service.
    #[must_use]
    pub fn service(&self) -> &InsuredService {
        &self.inner.service
    }
}
