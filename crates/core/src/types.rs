/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Caller-supplied extra attributes of a device, keyed by field name.
pub type PropertyBag = serde_json::Map<String, serde_json::Value>;
