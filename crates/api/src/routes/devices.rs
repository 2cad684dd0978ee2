//! Route definitions for the `/devices` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use crate::handlers::devices;
use crate::middleware::device_validation::validate_device_request;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// GET    /       -> list_devices
/// POST   /       -> create_device   (validated)
/// GET    /{id}   -> get_device
/// PUT    /{id}   -> update_device   (validated)
/// DELETE /{id}   -> delete_device
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/{id}",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route_layer(from_fn_with_state(state, validate_device_request))
}
