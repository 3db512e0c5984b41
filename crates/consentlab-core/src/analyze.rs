//! Document Analyzer: consent text in, `RiskAssessment` out.
//!
//! # Pipeline
//!
//!   text → [blank check] → backend → JSON span → verify → risk level → assessment
//!
//! The backend is called at most once per `analyze()`. Nothing is retried and
//! no field is ever defaulted; every failure is returned to the caller.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use consentlab_contracts::{
    assessment::{RiskAssessment, RiskLevel},
    backend::GenerateRequest,
    error::AnalysisError,
    verify::{ResponseSchema, VerificationRule, VerificationRuleType},
};

use crate::backend::call_backend;
use crate::prompts::analysis_prompt;
use crate::response::parse_json_payload;
use crate::traits::{GenerativeBackend, ResponseVerifier};

pub const ANALYSIS_SCHEMA_ID: &str = "consent-analysis-v1";

/// The shape an analysis payload must have before it is trusted.
///
/// `riskLevel` is left untyped here: any present value that is not one of the
/// three levels is reported as an invalid risk level, not a shape failure.
pub fn analysis_schema() -> ResponseSchema {
    ResponseSchema {
        schema_id: ANALYSIS_SCHEMA_ID.to_string(),
        json_schema: json!({
            "type": "object",
            "required": ["summary", "riskLevel", "riskFactors"],
            "properties": {
                "summary": { "type": "string" },
                "riskFactors": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            }
        }),
        rules: vec![
            VerificationRule {
                rule_id: "summary-non-blank".to_string(),
                description: "The summary must contain text".to_string(),
                rule_type: VerificationRuleType::NonBlankString { field_path: "summary".to_string() },
            },
            VerificationRule {
                rule_id: "risk-level-present".to_string(),
                description: "A risk level must be given".to_string(),
                rule_type: VerificationRuleType::RequiredField { field_path: "riskLevel".to_string() },
            },
        ],
    }
}

/// Wire shape before the risk level is canonicalized.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    summary: String,
    risk_level: Value,
    risk_factors: Vec<String>,
}

/// Canonicalize whatever the reply put under `riskLevel`. Non-strings keep
/// their JSON text in the error.
fn canonical_risk_level(value: &Value) -> Result<RiskLevel, AnalysisError> {
    let text = value.as_str().map(str::to_owned).unwrap_or_else(|| value.to_string());
    RiskLevel::from_str(&text).map_err(|e| {
        warn!(value = %e.0, "analysis returned an invalid risk level");
        AnalysisError::InvalidRiskLevel { value: e.0 }
    })
}

/// Drop blank entries from `factors`, keeping the order of the rest.
fn non_blank_factors(factors: Vec<String>) -> Vec<String> {
    let listed = factors.len();
    let kept: Vec<String> = factors.into_iter().filter(|f| !f.trim().is_empty()).collect();
    if kept.len() < listed {
        warn!(dropped = listed - kept.len(), kept = kept.len(), "analysis listed blank risk factors");
    }
    kept
}

pub struct DocumentAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    verifier: Arc<dyn ResponseVerifier>,
    schema: ResponseSchema,
    timeout: Duration,
}

impl DocumentAnalyzer {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        verifier: Arc<dyn ResponseVerifier>,
        timeout: Duration,
    ) -> Self {
        Self { backend, verifier, schema: analysis_schema(), timeout }
    }

    /// Analyze consent text into a summary, risk level, and risk factors.
    ///
    /// # Errors
    ///
    /// - `EmptyDocument` for blank input (the backend is not called)
    /// - `Backend` when the call fails or times out
    /// - `UnparseableResponse` when no JSON object can be read from the reply
    /// - `SchemaViolation` when the object lacks the analysis shape
    /// - `InvalidRiskLevel` when the level is not low, medium, or high
    ///
    /// Blank risk factor entries are dropped, not rejected.
    pub async fn analyze(&self, text: &str) -> Result<RiskAssessment, AnalysisError> {
        if text.trim().is_empty() {
            warn!("refusing to analyze an empty document");
            return Err(AnalysisError::EmptyDocument);
        }

        let request = GenerateRequest::text(analysis_prompt(text));
        let reply = call_backend(self.backend.as_ref(), &request, self.timeout, "analyze").await?;

        // ── Locate and parse the payload ─────────────────────────────────────
        let payload = parse_json_payload(&reply).map_err(|e| {
            warn!(reply_len = reply.len(), error = %e, "analysis reply has no usable JSON");
            AnalysisError::UnparseableResponse { detail: e.to_string() }
        })?;

        // ── Verify shape ─────────────────────────────────────────────────────
        let report = self.verifier.verify(&payload, &self.schema);
        if !report.passed {
            let failures = report.failure_messages();
            warn!(
                schema_id = %self.schema.schema_id,
                failure_count = failures.len(),
                "analysis payload failed verification"
            );
            return Err(AnalysisError::SchemaViolation { failures });
        }

        let raw: RawAnalysis = serde_json::from_value(payload)
            .map_err(|e| AnalysisError::SchemaViolation { failures: vec![e.to_string()] })?;

        // ── Canonicalize risk level ──────────────────────────────────────────
        let risk_level = canonical_risk_level(&raw.risk_level)?;

        let assessment = RiskAssessment {
            summary: raw.summary,
            risk_level,
            risk_factors: non_blank_factors(raw.risk_factors),
        };

        if assessment.is_flagged() {
            warn!(risk_level = %assessment.risk_level, "analysis listed no risk factors");
        }
        debug!(summary_len = assessment.summary.len(), "analysis payload accepted");
        info!(
            risk_level = %assessment.risk_level,
            risk_factor_count = assessment.risk_factors.len(),
            "document analyzed"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DEFAULT_TIMEOUT;
    use crate::test_support::{FieldRuleVerifier, ScriptedBackend};
    use consentlab_contracts::error::BackendError;

    fn analyzer(backend: Arc<ScriptedBackend>) -> DocumentAnalyzer {
        DocumentAnalyzer::new(backend, Arc::new(FieldRuleVerifier), DEFAULT_TIMEOUT)
    }

    #[tokio::test]
    async fn parses_json_wrapped_in_prose() {
        let backend = Arc::new(ScriptedBackend::replying([
            "Sure! Here is the analysis:\n```json\n{\"summary\": \"Your appendix will be removed.\", \
             \"riskLevel\": \"medium\", \"riskFactors\": [\"Bleeding\", \"Infection\", \"Scarring\"]}\n```",
        ]));
        let assessment = analyzer(backend.clone()).analyze("Appendectomy consent").await.unwrap();

        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.risk_factors.len(), 3);
        assert_eq!(backend.call_count(), 1);
        assert!(backend.last_prompt().contains("Appendectomy consent"));
    }

    #[tokio::test]
    async fn risk_level_is_canonicalized() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "Medium ", "riskFactors": ["a"]}"#,
        ]));
        let assessment = analyzer(backend).analyze("text").await.unwrap();
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn severe_risk_level_is_rejected() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "severe", "riskFactors": ["a"]}"#,
        ]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        assert_eq!(err.reason(), "invalid-risk-level");
        assert_eq!(err, AnalysisError::InvalidRiskLevel { value: "severe".into() });
    }

    #[tokio::test]
    async fn numeric_risk_level_is_an_invalid_risk_level() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": 3, "riskFactors": ["a"]}"#,
        ]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        assert_eq!(err, AnalysisError::InvalidRiskLevel { value: "3".into() });
    }

    #[tokio::test]
    async fn missing_risk_level_is_a_schema_violation() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": null, "riskFactors": ["a"]}"#,
        ]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        match err {
            AnalysisError::SchemaViolation { failures } => {
                assert!(failures[0].starts_with("[risk-level-present]"));
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_risk_factors_are_dropped() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "medium", "riskFactors": ["Bleeding", "Infection", "", "  "]}"#,
        ]));
        let assessment = analyzer(backend.clone()).analyze("text").await.unwrap();
        assert_eq!(assessment.risk_factors, vec!["Bleeding".to_string(), "Infection".to_string()]);
        assert!(!assessment.is_flagged());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn only_blank_risk_factors_leave_the_assessment_flagged() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "low", "riskFactors": [" "]}"#,
        ]));
        let assessment = analyzer(backend).analyze("text").await.unwrap();
        assert!(assessment.risk_factors.is_empty());
        assert!(assessment.is_flagged());
    }

    #[tokio::test]
    async fn reply_without_json_is_unparseable() {
        let backend = Arc::new(ScriptedBackend::replying(["I'm unable to analyze this document."]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        assert_eq!(err.reason(), "unparseable-response");
    }

    #[tokio::test]
    async fn blank_summary_is_a_schema_violation() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "  ", "riskLevel": "low", "riskFactors": []}"#,
        ]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        match err {
            AnalysisError::SchemaViolation { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].starts_with("[summary-non-blank]"));
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrongly_typed_factors_are_a_schema_violation() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "low", "riskFactors": "bleeding"}"#,
        ]));
        let err = analyzer(backend).analyze("text").await.unwrap_err();
        assert_eq!(err.reason(), "schema-violation");
    }

    #[tokio::test]
    async fn empty_risk_factors_are_tolerated() {
        let backend = Arc::new(ScriptedBackend::replying([
            r#"{"summary": "s", "riskLevel": "low", "riskFactors": []}"#,
        ]));
        let assessment = analyzer(backend).analyze("text").await.unwrap();
        assert!(assessment.is_flagged());
    }

    #[tokio::test]
    async fn empty_document_never_reaches_backend() {
        let backend = Arc::new(ScriptedBackend::replying(["{}"]));
        let err = analyzer(backend.clone()).analyze(" \t\n").await.unwrap_err();
        assert_eq!(err, AnalysisError::EmptyDocument);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn backend_failure_is_not_retried() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Http {
            status: 429,
            body: "quota".into(),
        }));
        let err = analyzer(backend.clone()).analyze("text").await.unwrap_err();
        assert_eq!(err.reason(), "backend-failure");
        assert_eq!(backend.call_count(), 1);
    }
}
