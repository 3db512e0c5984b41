//! # consentlab-ref-hospital
//!
//! Hospital reference runtime for the ConsentLab consent pipeline.
//!
//! Demonstrates the pipeline end to end with mock data and a simulated
//! backend:
//!
//! 1. **Upload Consent**: PDF text layer extraction and risk analysis,
//!    including an image-only PDF that never reaches the analyzer.
//! 2. **Scan Consent**: a camera capture recognized by the backend, and a
//!    form whose analysis is rejected for an invalid risk level.
//! 3. **Consent Chat**: summary translation and grounded Q&A in the
//!    patient's language, degrading to an apology during an outage.
//! 4. **Patient Intake**: report extraction and patient ID issue under an
//!    explicit staff session.
//! 5. **Consent Signing**: consent registration and the DigiLocker ceremony.
//!
//! All data is hardcoded and fictional. No external API calls are made.

use std::sync::Arc;

use consentlab_config::Settings;
use consentlab_contracts::error::{ConfigError, ConsentResult};
use consentlab_core::{ConsentPipeline, GenerativeBackend};
use consentlab_verify::SchemaVerifier;

pub mod desk;
pub mod mock_data;
pub mod scenarios;
pub mod signing;
pub mod simulated;

use simulated::MockPdfReader;

const HOSPITAL_SETTINGS: &str = include_str!("../config/hospital.toml");

/// The settings the reference hospital runs with.
pub fn hospital_settings() -> Result<Settings, ConfigError> {
    Settings::from_toml_str(HOSPITAL_SETTINGS)
}

/// A pipeline over `backend` that reads mock PDFs and verifies payloads
/// against JSON Schema and the field rules.
pub fn hospital_pipeline(backend: Arc<dyn GenerativeBackend>) -> ConsentResult<ConsentPipeline> {
    let options = hospital_settings()?.pipeline_options()?;
    Ok(ConsentPipeline::with_reader(
        backend,
        Arc::new(SchemaVerifier::new()),
        Arc::new(MockPdfReader),
        options,
    ))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use consentlab_contracts::{
        assessment::RiskLevel,
        backend::{GenerateRequest, GenerateResponse},
        error::BackendError,
    };
    use consentlab_core::TextSource;

    use super::*;
    use crate::mock_data::{mock_pdf, APPENDECTOMY_CONSENT};

    struct FixedReply(&'static str);

    #[async_trait]
    impl GenerativeBackend for FixedReply {
        async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
            Ok(GenerateResponse::new(self.0))
        }
    }

    #[test]
    fn bundled_settings_are_valid() {
        let settings = hospital_settings().unwrap();
        let options = settings.pipeline_options().unwrap();
        assert_eq!(options.enabled_languages.len(), 12);
        assert!(options.translation_cache);
        assert_eq!(options.timeout.as_secs(), 20);
    }

    #[tokio::test]
    async fn blank_risk_factor_is_dropped_not_rejected() {
        let backend = Arc::new(FixedReply(
            r#"{"summary": "Your appendix will be removed.", "riskLevel": "medium", "riskFactors": ["Bleeding", "Infection", ""]}"#,
        ));
        let pipeline = hospital_pipeline(backend).unwrap();

        let analyzed = pipeline.process(TextSource::Pdf(mock_pdf(APPENDECTOMY_CONSENT))).await.unwrap();
        assert_eq!(analyzed.assessment.risk_level, RiskLevel::Medium);
        assert_eq!(analyzed.assessment.risk_factors, vec!["Bleeding".to_string(), "Infection".to_string()]);
    }

    #[tokio::test]
    async fn numeric_risk_level_is_reported_as_invalid() {
        let backend = Arc::new(FixedReply(r#"{"summary": "s", "riskLevel": 3, "riskFactors": []}"#));
        let pipeline = hospital_pipeline(backend).unwrap();

        let err = pipeline.process(TextSource::Pdf(mock_pdf(APPENDECTOMY_CONSENT))).await.unwrap_err();
        assert_eq!(err.reason(), "invalid-risk-level");
    }
}
