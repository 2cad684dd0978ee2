//! Aggregation of per-rule results.

use serde::Serialize;

/// Result of validating one device against its rule group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Violation messages in rule declaration order.
    pub violations: Vec<String>,
}

impl ValidationOutcome {
    /// Outcome for a device no rule group applies to.
    pub fn accepted() -> Self {
        aggregate(Vec::new())
    }
}

pub fn aggregate(violations: Vec<String>) -> ValidationOutcome {
    ValidationOutcome {
        valid: violations.is_empty(),
        violations,
    }
}
