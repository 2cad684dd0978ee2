//! Device attribute validation in front of the device create/update handlers.
//!
//! Mounted with `axum::middleware::from_fn_with_state` on the device routes.
//! Only POST and PUT are inspected; every other method passes straight
//! through. The body is buffered, checked, and handed to the handler
//! unchanged when the device is admitted.
//!
//! Outcomes: a missing or broken rule catalog answers 500 with a plain-text
//! body; a malformed body answers 400; rule violations answer 400 with
//! `{ "errors": [...] }`.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use devices_core::device::DeviceRequest;
use devices_core::validation::validator::ValidationError;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn validate_device_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    if !matches!(*request.method(), Method::POST | Method::PUT) {
        return Ok(next.run(request).await);
    }

    // Catalog failures take precedence over body errors.
    let catalog = state
        .validator
        .source()
        .snapshot()
        .await
        .map_err(ValidationError::from)?;

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;

    let device: DeviceRequest = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid request: {e}")))?;
    device
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state.validator.validate_against(&catalog, &device).await?;
    if !outcome.valid {
        tracing::info!(
            type_id = device.type_id,
            violations = outcome.violations.len(),
            "Device rejected by attribute rules"
        );
        return Err(AppError::ValidationFailed(outcome.violations));
    }

    tracing::debug!(type_id = device.type_id, "Device attributes validated");
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
