//! Activation condition of a rule group.

use serde_json::Value;

use super::catalog::RuleGroup;
use crate::types::PropertyBag;

/// Whether `group` applies to `bag`.
///
/// The trigger field must be present and its stringified value must equal the
/// trigger value, ignoring case. An absent field never triggers.
///
/// The field is looked up by exact name first, then ignoring ASCII case.
pub fn is_triggered(group: &RuleGroup, bag: &PropertyBag) -> bool {
    trigger_field_value(bag, &group.trigger_field)
        .is_some_and(|value| stringify(value).to_lowercase() == group.trigger_value.to_lowercase())
}

fn trigger_field_value<'a>(bag: &'a PropertyBag, field: &str) -> Option<&'a Value> {
    bag.get(field).or_else(|| {
        bag.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

/// Canonical string form of a property value.
///
/// Strings yield their contents, `null` yields the empty string, and every
/// other value yields its compact JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
