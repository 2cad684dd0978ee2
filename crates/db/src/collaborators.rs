//! sqlx-backed implementations of the `devices_core` collaborator traits.

use async_trait::async_trait;
use devices_core::device::{Device, DeviceRequest, DeviceStore, DeviceTypeLookup};
use devices_core::error::CoreError;
use devices_core::types::DbId;

use crate::repositories::{DeviceRepo, DeviceTypeRepo};
use crate::DbPool;

/// Map a sqlx error into the domain error the traits return.
///
/// A foreign-key violation (PostgreSQL code 23503) can only come from a
/// `device_type_id` that does not exist, so it is a caller error.
fn db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23503") {
            return CoreError::Validation(
                "typeId does not reference a known device type".to_string(),
            );
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

/// Resolves device type names from the `device_types` table.
#[derive(Clone)]
pub struct PgDeviceTypeLookup {
    pool: DbPool,
}

impl PgDeviceTypeLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceTypeLookup for PgDeviceTypeLookup {
    async fn device_type_name(&self, type_id: DbId) -> Result<Option<String>, CoreError> {
        DeviceTypeRepo::find_name_by_id(&self.pool, type_id)
            .await
            .map_err(db_error)
    }
}

/// Stores devices in the `devices` table.
#[derive(Clone)]
pub struct PgDeviceStore {
    pool: DbPool,
}

impl PgDeviceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for PgDeviceStore {
    async fn list(&self) -> Result<Vec<Device>, CoreError> {
        let rows = DeviceRepo::list(&self.pool).await.map_err(db_error)?;
        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Device>, CoreError> {
        let row = DeviceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?;
        Ok(row.map(Device::from))
    }

    async fn create(&self, input: &DeviceRequest) -> Result<Device, CoreError> {
        let row = DeviceRepo::create(&self.pool, input)
            .await
            .map_err(db_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: DbId, input: &DeviceRequest) -> Result<Option<Device>, CoreError> {
        let row = DeviceRepo::update(&self.pool, id, input)
            .await
            .map_err(db_error)?;
        Ok(row.map(Device::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        DeviceRepo::delete(&self.pool, id).await.map_err(db_error)
    }
}
