//! Response schema and verification report types.
//!
//! Every JSON payload scraped out of a model reply is checked against a
//! `ResponseSchema` before it is converted into a typed value. Only a passing
//! `VerificationReport` lets the conversion proceed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a parsed model payload must look like.
///
/// Combines a JSON Schema document with rules JSON Schema cannot express
/// conveniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Unique identifier for this schema (e.g. "consent-analysis-v1").
    pub schema_id: String,
    /// Structural JSON Schema document. `Value::Null` disables the check.
    pub json_schema: Value,
    /// Additional rules evaluated after structural validation.
    pub rules: Vec<VerificationRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Referenced in failure reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: VerificationRuleType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// The field at `field_path` must be present and non-null.
    RequiredField {
        /// Dotted path, e.g. "patient.name".
        field_path: String,
    },

    /// The field must be a string with at least one non-whitespace character.
    NonBlankString { field_path: String },
}

/// The result of running a `ResponseSchema` against one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if all rules passed.
    pub passed: bool,
    /// Every failure found, in evaluation order. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// Failure descriptions formatted as "[rule_id] message".
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}
