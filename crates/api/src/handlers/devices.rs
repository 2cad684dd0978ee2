//! Handlers for the `/devices` resource.
//!
//! Create and update bodies have already passed
//! [`validate_device_request`](crate::middleware::device_validation::validate_device_request)
//! by the time they arrive here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devices_core::device::{Device, DeviceRequest};
use devices_core::error::CoreError;
use devices_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Device",
        id,
    })
}

/// GET /api/devices
pub async fn list_devices(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Device>>>> {
    let devices = state.devices.list().await?;
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/devices/{id}
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Device>>> {
    let device = state
        .devices
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /api/devices
///
/// Returns the created device with HTTP 201.
pub async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<DeviceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Device>>)> {
    let device = state.devices.create(&input).await?;
    tracing::info!(device_id = device.id, type_id = device.type_id, "Device created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// PUT /api/devices/{id}
///
/// Replaces the device. Returns 404 if it does not exist.
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DeviceRequest>,
) -> AppResult<Json<DataResponse<Device>>> {
    let device = state
        .devices
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(device_id = id, "Device updated");
    Ok(Json(DataResponse { data: device }))
}

/// DELETE /api/devices/{id}
///
/// Returns 204 on success, 404 if not found.
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.devices.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
