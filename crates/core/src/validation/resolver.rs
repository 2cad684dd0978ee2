//! Rule group lookup by device type name.

use super::catalog::{RuleCatalog, RuleGroup};

/// Find the rule group for `device_type_name`.
///
/// Matching is case-insensitive and exact; the first matching group wins.
/// `None` means the type is unconstrained.
pub fn resolve<'a>(catalog: &'a RuleCatalog, device_type_name: &str) -> Option<&'a RuleGroup> {
    let wanted = device_type_name.to_lowercase();
    catalog
        .groups()
        .iter()
        .find(|group| group.device_type_name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::catalog::{Constraint, FieldRule};

    fn group(device_type: &str, trigger_value: &str) -> RuleGroup {
        RuleGroup {
            device_type_name: device_type.to_string(),
            trigger_field: "connection".to_string(),
            trigger_value: trigger_value.to_string(),
            rules: vec![FieldRule {
                param_name: "frequency".to_string(),
                constraint: Constraint::Membership(vec!["5GHz".to_string()]),
            }],
        }
    }

    #[test]
    fn matches_case_insensitively() {
        let catalog = RuleCatalog::new(vec![group("Sensor", "wireless")]);
        assert!(resolve(&catalog, "sensor").is_some());
        assert!(resolve(&catalog, "SENSOR").is_some());
    }

    #[test]
    fn requires_exact_name() {
        let catalog = RuleCatalog::new(vec![group("sensor", "wireless")]);
        assert!(resolve(&catalog, "sens").is_none());
        assert!(resolve(&catalog, "sensor-x").is_none());
    }

    #[test]
    fn unknown_type_resolves_to_none() {
        let catalog = RuleCatalog::new(vec![group("sensor", "wireless")]);
        assert!(resolve(&catalog, "camera").is_none());
        assert!(resolve(&RuleCatalog::default(), "sensor").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let catalog = RuleCatalog::new(vec![group("sensor", "wireless"), group("SENSOR", "wired")]);
        let found = resolve(&catalog, "sensor").unwrap();
        assert_eq!(found.trigger_value, "wireless");
    }
}
