//! Repository for the `device_types` table.

use devices_core::types::DbId;
use sqlx::PgPool;

/// Read access to device types.
pub struct DeviceTypeRepo;

impl DeviceTypeRepo {
    /// Name of the device type with `id`, used as the rule catalog key.
    pub async fn find_name_by_id(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM device_types WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
