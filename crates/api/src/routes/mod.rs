pub mod devices;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /devices                 list, create (create is validated)
/// /devices/{id}            get, update, delete (update is validated)
/// ```
///
/// `state` is needed up front to attach the validation middleware.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new().nest("/devices", devices::router(state))
}
