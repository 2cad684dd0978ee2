use std::sync::Arc;

use devices_core::device::DeviceStore;
use devices_core::validation::validator::DeviceValidator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Validates device create/update requests against the rule catalog.
    pub validator: Arc<DeviceValidator>,
    /// Device persistence.
    pub devices: Arc<dyn DeviceStore>,
}
