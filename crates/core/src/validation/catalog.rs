//! Rule catalog types and the loader that builds them from a JSON resource.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Failure to produce a [`RuleCatalog`] from its resource.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rule catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} reading rule catalog {}", .path.display())]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("rule catalog is not valid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule '{param}' for device type '{device_type}' must be a pattern string or an array of strings")]
    InvalidConstraint { device_type: String, param: String },
}

/// Ordered, immutable set of rule groups.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    groups: Vec<RuleGroup>,
}

/// Rules applied to one device type while its trigger condition holds.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub device_type_name: String,
    pub trigger_field: String,
    pub trigger_value: String,
    pub rules: Vec<FieldRule>,
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub param_name: String,
    pub constraint: Constraint,
}

#[derive(Debug, Clone)]
pub enum Constraint {
    /// The value must equal one of these literals (case-sensitive).
    Membership(Vec<String>),
    Pattern(PatternRule),
}

/// A pattern constraint, compiled once when the catalog is built.
///
/// `compiled` is `None` when the source is not a valid regex; such a rule
/// never matches.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub source: String,
    pub compiled: Option<Regex>,
}

impl PatternRule {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %source, error = %e, "Invalid rule pattern, rule will always fail");
                None
            }
        };
        Self { source, compiled }
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(value))
    }
}

// ── Resource shape ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Groups(Vec<RawRuleGroup>),
    Wrapped {
        #[serde(alias = "Validations")]
        validations: Vec<RawRuleGroup>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRuleGroup {
    #[serde(alias = "Type")]
    r#type: String,
    #[serde(alias = "PreRequestName")]
    pre_request_name: String,
    #[serde(alias = "PreRequestValue")]
    pre_request_value: String,
    #[serde(default, alias = "Rules")]
    rules: Vec<RawRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    #[serde(alias = "ParamName")]
    param_name: String,
    #[serde(alias = "Regex")]
    regex: Value,
}

impl RuleCatalog {
    pub fn new(groups: Vec<RuleGroup>) -> Self {
        Self { groups }
    }

    /// Parse a catalog from its JSON text.
    ///
    /// Accepts either a top-level array of rule groups or an object with a
    /// `validations` array.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let raw_groups = match serde_json::from_str::<CatalogDocument>(text)? {
            CatalogDocument::Groups(groups) => groups,
            CatalogDocument::Wrapped { validations } => validations,
        };

        let groups = raw_groups
            .into_iter()
            .map(RuleGroup::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        warn_on_duplicate_types(&groups);
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl TryFrom<RawRuleGroup> for RuleGroup {
    type Error = CatalogError;

    fn try_from(raw: RawRuleGroup) -> Result<Self, Self::Error> {
        let rules = raw
            .rules
            .into_iter()
            .map(|rule| {
                let constraint = constraint_from_value(rule.regex).ok_or_else(|| {
                    CatalogError::InvalidConstraint {
                        device_type: raw.r#type.clone(),
                        param: rule.param_name.clone(),
                    }
                })?;
                Ok(FieldRule {
                    param_name: rule.param_name,
                    constraint,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(RuleGroup {
            device_type_name: raw.r#type,
            trigger_field: raw.pre_request_name,
            trigger_value: raw.pre_request_value,
            rules,
        })
    }
}

/// A string selects a pattern, an array of strings selects membership.
fn constraint_from_value(value: Value) -> Option<Constraint> {
    match value {
        Value::String(pattern) => Some(Constraint::Pattern(PatternRule::new(pattern))),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Constraint::Membership),
        _ => None,
    }
}

fn warn_on_duplicate_types(groups: &[RuleGroup]) {
    let mut seen = HashSet::new();
    for group in groups {
        if !seen.insert(group.device_type_name.to_lowercase()) {
            tracing::warn!(
                device_type = %group.device_type_name,
                "Duplicate rule group for device type, only the first one applies"
            );
        }
    }
}

/// Read and parse the catalog at `path`, giving up after `timeout`.
pub async fn load_catalog(path: &Path, timeout: Duration) -> Result<RuleCatalog, CatalogError> {
    let text = tokio::time::timeout(timeout, tokio::fs::read_to_string(path))
        .await
        .map_err(|_| CatalogError::Timeout {
            path: path.to_path_buf(),
            timeout,
        })?
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = RuleCatalog::from_json_str(&text)?;
    tracing::debug!(path = %path.display(), groups = catalog.len(), "Loaded rule catalog");
    Ok(catalog)
}
