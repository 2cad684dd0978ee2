//! End-to-end validation of a device request.
//!
//! Runs the per-call state machine: take a catalog snapshot, resolve the
//! device type name through the lookup collaborator, resolve the rule group,
//! check its trigger, evaluate every rule, aggregate.

use std::str::FromStr;
use std::sync::Arc;

use super::catalog::{CatalogError, RuleCatalog};
use super::constraint::evaluate;
use super::outcome::{aggregate, ValidationOutcome};
use super::resolver::resolve;
use super::source::CatalogSource;
use super::trigger::is_triggered;
use crate::device::{DeviceRequest, DeviceTypeLookup};
use crate::error::CoreError;
use crate::types::PropertyBag;

/// What to do with a request whose type id the lookup does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// Treat the device as having no applicable rule group.
    Allow,
    /// Reject the request with a single violation.
    Reject,
}

impl FromStr for UnknownTypePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown device type policy '{other}', expected 'allow' or 'reject'"
            )),
        }
    }
}

/// Operational failure while validating. Never the caller's fault.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("validation configuration could not be loaded: {0}")]
    Configuration(#[from] CatalogError),

    #[error("device type lookup failed: {0}")]
    Lookup(#[source] CoreError),
}

/// Validate `bag` for a device of type `device_type_name`.
///
/// `trigger_scope` is the bag the group's trigger is checked against; rules
/// are evaluated against `bag`.
pub fn validate_properties(
    catalog: &RuleCatalog,
    device_type_name: &str,
    trigger_scope: &PropertyBag,
    bag: &PropertyBag,
) -> ValidationOutcome {
    let Some(group) = resolve(catalog, device_type_name) else {
        tracing::debug!(device_type = %device_type_name, "No rule group for device type");
        return ValidationOutcome::accepted();
    };

    if !is_triggered(group, trigger_scope) {
        tracing::debug!(
            device_type = %device_type_name,
            trigger_field = %group.trigger_field,
            "Rule group not triggered"
        );
        return ValidationOutcome::accepted();
    }

    let violations = group
        .rules
        .iter()
        .filter_map(|rule| evaluate(rule, bag))
        .collect();
    aggregate(violations)
}

/// Validates device create/update requests against the current catalog.
pub struct DeviceValidator {
    source: Arc<CatalogSource>,
    lookup: Arc<dyn DeviceTypeLookup>,
    unknown_type_policy: UnknownTypePolicy,
}

impl DeviceValidator {
    pub fn new(
        source: Arc<CatalogSource>,
        lookup: Arc<dyn DeviceTypeLookup>,
        unknown_type_policy: UnknownTypePolicy,
    ) -> Self {
        Self {
            source,
            lookup,
            unknown_type_policy,
        }
    }

    pub fn source(&self) -> &Arc<CatalogSource> {
        &self.source
    }

    /// Validate `request` against a fresh snapshot from the catalog source.
    pub async fn validate(
        &self,
        request: &DeviceRequest,
    ) -> Result<ValidationOutcome, ValidationError> {
        let catalog = self.source.snapshot().await?;
        self.validate_against(&catalog, request).await
    }

    /// Validate `request` against a snapshot the caller already holds.
    pub async fn validate_against(
        &self,
        catalog: &RuleCatalog,
        request: &DeviceRequest,
    ) -> Result<ValidationOutcome, ValidationError> {
        let type_name = self
            .lookup
            .device_type_name(request.type_id)
            .await
            .map_err(ValidationError::Lookup)?;

        let Some(type_name) = type_name else {
            return Ok(self.unknown_type(request));
        };

        Ok(validate_properties(
            catalog,
            &type_name,
            &request.trigger_scope(),
            &request.additional_properties,
        ))
    }

    fn unknown_type(&self, request: &DeviceRequest) -> ValidationOutcome {
        match self.unknown_type_policy {
            UnknownTypePolicy::Allow => {
                tracing::warn!(
                    type_id = request.type_id,
                    "Unknown device type, admitting without attribute rules"
                );
                ValidationOutcome::accepted()
            }
            UnknownTypePolicy::Reject => aggregate(vec![format!(
                "typeId {} does not reference a known device type",
                request.type_id
            )]),
        }
    }
}
