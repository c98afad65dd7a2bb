//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::audio::SessionStore;
use crate::core::backend::AdapterService;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc so the state clones cheaply into each
/// worker and WebSocket task.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Configured backend adapters
    pub adapters: Arc<AdapterService>,
    /// In-flight chunked-audio sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, adapters: AdapterService) -> Self {
        Self {
            config: Arc::new(config),
            adapters: Arc::new(adapters),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
