//! Device entity model.

use devices_core::device::Device;
use devices_core::types::{DbId, PropertyBag, Timestamp};
use sqlx::FromRow;

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    pub id: DbId,
    pub name: String,
    pub is_enabled: bool,
    pub device_type_id: DbId,
    pub additional_properties: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        let additional_properties = match row.additional_properties {
            serde_json::Value::Object(map) => map,
            _ => PropertyBag::new(),
        };
        Device {
            id: row.id,
            name: row.name,
            is_enabled: row.is_enabled,
            type_id: row.device_type_id,
            additional_properties,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
