//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::upstream::ReportSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where report counts come from
    pub source: Arc<dyn ReportSource>,
    /// Loaded configuration (dashboard defaults)
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given count source.
    pub fn new(source: Arc<dyn ReportSource>, config: AppConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}
