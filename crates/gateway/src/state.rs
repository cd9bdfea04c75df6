//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::HrResourceService;
use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub hr: Arc<dyn HrResourceService>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(hr: Arc<dyn HrResourceService>, config: GatewayConfig) -> Self {
        Self { hr, config }
    }
}
