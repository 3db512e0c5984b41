//! Schema-based payload verifier for ConsentLab.
//!
//! `SchemaVerifier` implements the `ResponseVerifier` trait from
//! `consentlab-core`. A payload is first checked against the schema's JSON
//! Schema document, then against each of its rules in order; every failure is
//! reported, not just the first.

use serde_json::Value;
use tracing::{debug, warn};

use consentlab_contracts::verify::{
    ResponseSchema, VerificationFailure, VerificationReport, VerificationRuleType,
};
use consentlab_core::traits::ResponseVerifier;

/// Rule id reported for JSON Schema failures.
pub const SCHEMA_RULE_ID: &str = "json-schema";

/// The value at a dotted path such as `"patient.name"`; JSON `null` counts as
/// absent.
fn field_at<'v>(payload: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(payload, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

pub struct SchemaVerifier;

impl SchemaVerifier {
    pub fn new() -> Self {
        Self
    }

    fn structural_failures(payload: &Value, schema: &ResponseSchema) -> Vec<VerificationFailure> {
        if schema.json_schema.is_null() {
            return Vec::new();
        }

        let failure = |message: String| {
            warn!(schema_id = %schema.schema_id, %message, "payload failed JSON Schema");
            VerificationFailure { rule_id: SCHEMA_RULE_ID.to_string(), message }
        };
        match jsonschema::validator_for(&schema.json_schema) {
            Ok(validator) => validator
                .iter_errors(payload)
                .map(|error| failure(format!("{} at '{}'", error, error.instance_path)))
                .collect(),
            Err(e) => vec![failure(format!("invalid JSON Schema document: {e}"))],
        }
    }

    /// Why `payload` breaks `rule`, or `None` when it holds.
    fn check_rule(payload: &Value, rule: &VerificationRuleType) -> Option<String> {
        match rule {
            VerificationRuleType::RequiredField { field_path } => field_at(payload, field_path)
                .is_none()
                .then(|| format!("'{field_path}' is absent or null")),

            VerificationRuleType::NonBlankString { field_path } => match field_at(payload, field_path) {
                None => Some(format!("'{field_path}' is absent or null")),
                Some(Value::String(s)) if s.trim().is_empty() => Some(format!("'{field_path}' is blank")),
                Some(Value::String(_)) => None,
                Some(other) => Some(format!("'{field_path}' should be a string, got {other}")),
            },
        }
    }
}

impl Default for SchemaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseVerifier for SchemaVerifier {
    fn verify(&self, payload: &Value, schema: &ResponseSchema) -> VerificationReport {
        let mut failures = Self::structural_failures(payload, schema);

        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "checking payload rule");
            if let Some(message) = Self::check_rule(payload, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "payload rule failed");
                failures.push(VerificationFailure { rule_id: rule.rule_id.clone(), message });
            }
        }

        let passed = failures.is_empty();
        debug!(schema_id = %schema.schema_id, passed, failure_count = failures.len(), "payload checked");
        VerificationReport { passed, failures }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use consentlab_contracts::verify::{ResponseSchema, VerificationRule, VerificationRuleType};
    use consentlab_core::{analysis_schema, traits::ResponseVerifier};

    use super::SchemaVerifier;

    fn make_schema(json_schema: serde_json::Value, rules: Vec<VerificationRule>) -> ResponseSchema {
        ResponseSchema { schema_id: "test-schema-v1".to_string(), json_schema, rules }
    }

    fn rule(id: &str, rule_type: VerificationRuleType) -> VerificationRule {
        VerificationRule { rule_id: id.to_string(), description: format!("{id} check"), rule_type }
    }

    // ── JSON Schema ───────────────────────────────────────────────────────────

    #[test]
    fn schema_pass() {
        let schema = make_schema(
            json!({ "type": "object", "properties": { "summary": { "type": "string" } }, "required": ["summary"] }),
            vec![],
        );
        let report = SchemaVerifier::new().verify(&json!({ "summary": "ok" }), &schema);
        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    #[test]
    fn schema_fail_names_json_schema_rule() {
        let schema = make_schema(
            json!({ "type": "object", "required": ["summary"] }),
            vec![],
        );
        let report = SchemaVerifier::new().verify(&json!({ "other": 42 }), &schema);
        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "json-schema");
    }

    #[test]
    fn malformed_schema_document_is_a_failure() {
        let schema = make_schema(json!({ "type": 17 }), vec![]);
        let report = SchemaVerifier::new().verify(&json!({}), &schema);
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("invalid JSON Schema"));
    }

    // ── Field rules ───────────────────────────────────────────────────────────

    #[test]
    fn required_field_resolves_dotted_paths() {
        let schema = make_schema(
            serde_json::Value::Null,
            vec![rule("req-name", VerificationRuleType::RequiredField { field_path: "patient.name".into() })],
        );
        let verifier = SchemaVerifier::new();
        assert!(verifier.verify(&json!({ "patient": { "name": "Asha" } }), &schema).passed);

        let report = verifier.verify(&json!({ "patient": { "name": null } }), &schema);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("patient.name"));
    }

    #[test]
    fn non_blank_string_rejects_whitespace_and_non_strings() {
        let schema = make_schema(
            serde_json::Value::Null,
            vec![rule("summary", VerificationRuleType::NonBlankString { field_path: "summary".into() })],
        );
        let verifier = SchemaVerifier::new();
        assert!(verifier.verify(&json!({ "summary": "Fine." }), &schema).passed);
        assert!(!verifier.verify(&json!({ "summary": " \n" }), &schema).passed);
        assert!(!verifier.verify(&json!({ "summary": 3 }), &schema).passed);
    }

    // ── Consent analysis schema ───────────────────────────────────────────────

    #[test]
    fn accepts_well_formed_analysis() {
        let payload = json!({
            "summary": "You will have cataract surgery on one eye.",
            "riskLevel": "low",
            "riskFactors": ["Blurred vision", "Infection", "Raised eye pressure"]
        });
        let report = SchemaVerifier::new().verify(&payload, &analysis_schema());
        assert!(report.passed, "failures: {:?}", report.failure_messages());
    }

    #[test]
    fn blank_risk_factor_entries_pass_verification() {
        let payload = json!({
            "summary": "Your appendix will be removed.",
            "riskLevel": "medium",
            "riskFactors": ["Bleeding", "Infection", ""]
        });
        let report = SchemaVerifier::new().verify(&payload, &analysis_schema());
        assert!(report.passed, "failures: {:?}", report.failure_messages());
    }

    #[test]
    fn non_string_risk_level_passes_verification() {
        let payload = json!({ "summary": "s", "riskLevel": 3, "riskFactors": [] });
        let report = SchemaVerifier::new().verify(&payload, &analysis_schema());
        assert!(report.passed, "failures: {:?}", report.failure_messages());
    }

    #[test]
    fn collects_every_analysis_failure() {
        let payload = json!({
            "summary": "",
            "riskFactors": ["Bleeding", 7]
        });
        let report = SchemaVerifier::new().verify(&payload, &analysis_schema());
        let ids: Vec<_> = report.failures.iter().map(|f| f.rule_id.as_str()).collect();
        assert!(ids.contains(&"json-schema"));
        assert!(ids.contains(&"summary-non-blank"));
        assert!(ids.contains(&"risk-level-present"));
    }
}
