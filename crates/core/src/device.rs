//! Device request DTO and the collaborator traits the service depends on.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, PropertyBag, Timestamp};

/// Body of a device create/update request.
///
/// Wire names are camelCase; the PascalCase spellings and the `enabled` /
/// `typeReference` aliases are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[serde(alias = "Name")]
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default, alias = "enabled", alias = "IsEnabled")]
    pub is_enabled: bool,
    #[serde(alias = "typeReference", alias = "TypeId")]
    pub type_id: DbId,
    #[serde(
        default,
        alias = "AdditionalProperties",
        deserialize_with = "null_as_empty_bag"
    )]
    pub additional_properties: PropertyBag,
}

/// Wire names of the declared fields a trigger may name.
const DECLARED_FIELDS: [&str; 3] = ["name", "isEnabled", "typeId"];

impl DeviceRequest {
    /// Build the bag a rule group's trigger is evaluated against.
    ///
    /// Starts from `additional_properties` and sets the declared top-level
    /// fields (`name`, `isEnabled`, `typeId`) under their wire names. Bag keys
    /// that spell a declared field in any case are dropped, so the declared
    /// value is the only one a trigger can see.
    pub fn trigger_scope(&self) -> PropertyBag {
        let mut scope: PropertyBag = self
            .additional_properties
            .iter()
            .filter(|(key, _)| {
                !DECLARED_FIELDS
                    .iter()
                    .any(|declared| declared.eq_ignore_ascii_case(key))
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        scope.insert("name".to_string(), self.name.clone().into());
        scope.insert("isEnabled".to_string(), self.is_enabled.into());
        scope.insert("typeId".to_string(), self.type_id.into());
        scope
    }
}

fn null_as_empty_bag<'de, D>(deserializer: D) -> Result<PropertyBag, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PropertyBag>::deserialize(deserializer)?.unwrap_or_default())
}

/// A persisted device record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DbId,
    pub name: String,
    pub is_enabled: bool,
    pub type_id: DbId,
    pub additional_properties: PropertyBag,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Translates a numeric device type reference into the type name the rule
/// catalog is keyed by.
#[async_trait]
pub trait DeviceTypeLookup: Send + Sync {
    /// `Ok(None)` means the id does not reference a known device type.
    async fn device_type_name(&self, type_id: DbId) -> Result<Option<String>, CoreError>;
}

/// Persistence for device records. Only ever called after validation passed.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Device>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Device>, CoreError>;

    async fn create(&self, input: &DeviceRequest) -> Result<Device, CoreError>;

    /// Returns `None` if no device with `id` exists.
    async fn update(&self, id: DbId, input: &DeviceRequest) -> Result<Option<Device>, CoreError>;

    /// Returns `false` if no device with `id` exists.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}
