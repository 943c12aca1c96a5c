//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::StudentStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration (credentials, version) and the student store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn StudentStore>,
}

impl AppState {
    /// Creates a new application state from the given configuration and store.
    pub fn new(config: AppConfig, store: Arc<dyn StudentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
