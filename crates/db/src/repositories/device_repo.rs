//! Repository for the `devices` table.

use devices_core::device::DeviceRequest;
use devices_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::DeviceRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, is_enabled, device_type_id, additional_properties, created_at, updated_at";

/// Provides CRUD operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// List all devices, ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<DeviceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices ORDER BY id");
        sqlx::query_as::<_, DeviceRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeviceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, DeviceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new device, returning the created row.
    pub async fn create(pool: &PgPool, input: &DeviceRequest) -> Result<DeviceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (name, is_enabled, device_type_id, additional_properties)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRow>(&query)
            .bind(&input.name)
            .bind(input.is_enabled)
            .bind(input.type_id)
            .bind(serde_json::Value::Object(input.additional_properties.clone()))
            .fetch_one(pool)
            .await
    }

    /// Replace all fields of a device. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &DeviceRequest,
    ) -> Result<Option<DeviceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE devices
             SET name = $2, is_enabled = $3, device_type_id = $4,
                 additional_properties = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_enabled)
            .bind(input.type_id)
            .bind(serde_json::Value::Object(input.additional_properties.clone()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a device. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
