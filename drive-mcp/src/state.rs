//! Application state.

use drive_core::DriveApi;
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup and handed to every MCP session; the Drive client
/// is the only long-lived resource.
#[derive(Clone)]
pub struct AppState {
    /// Authenticated Drive client
    pub drive: Arc<dyn DriveApi>,
}

impl AppState {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self { drive }
    }
}
