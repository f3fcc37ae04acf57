//! Mapping options
//!
//! Deployments disagree on the letter case of extracted values and on whether a
//! malformed firmware string should stop the run. Both are explicit options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Letter case applied to extracted values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    /// Lower-case every extracted string
    #[default]
    Lower,
    /// Keep the controller's casing; models use the vendor's upper case
    Preserve,
}

impl CasePolicy {
    /// Apply the policy to a string
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            CasePolicy::Lower => value.to_lowercase(),
            CasePolicy::Preserve => value.to_string(),
        }
    }

    /// Apply the policy to a JSON value; non-strings pass through unchanged
    #[must_use]
    pub fn apply_value(self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.apply(&s)),
            other => other,
        }
    }
}

/// What happens when a present field does not match its expected format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldParsing {
    /// Abort the run
    #[default]
    Strict,
    /// Log a warning and record null
    Lenient,
}

/// Options shared by every rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingOptions {
    #[serde(default)]
    pub casing: CasePolicy,
    #[serde(default)]
    pub field_parsing: FieldParsing,
}
