//! Per-field constraint evaluation.

use super::catalog::{Constraint, FieldRule};
use super::trigger::stringify;
use crate::types::PropertyBag;

/// Check one rule against `bag`, returning the violation message if it fails.
///
/// A missing field is evaluated as the empty string.
pub fn evaluate(rule: &FieldRule, bag: &PropertyBag) -> Option<String> {
    let value = bag.get(&rule.param_name).map(stringify).unwrap_or_default();

    match &rule.constraint {
        Constraint::Membership(allowed) => {
            if allowed.iter().any(|candidate| *candidate == value) {
                None
            } else {
                Some(format!(
                    "{} must be one of: {}",
                    rule.param_name,
                    allowed.join(", ")
                ))
            }
        }
        Constraint::Pattern(pattern) => {
            if pattern.is_match(&value) {
                None
            } else {
                Some(format!(
                    "{} is not valid according to regex {}",
                    rule.param_name, pattern.source
                ))
            }
        }
    }
}
