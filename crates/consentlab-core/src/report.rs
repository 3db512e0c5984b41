//! Report Extractor: pulls patient details out of a medical report so staff
//! can pre-fill a registration form.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use consentlab_contracts::{backend::GenerateRequest, error::ReportError, patient::PatientDetails};

use crate::backend::call_backend;
use crate::prompts::report_prompt;
use crate::response::parse_json_payload;
use crate::traits::GenerativeBackend;

pub struct ReportExtractor {
    backend: Arc<dyn GenerativeBackend>,
    timeout: Duration,
}

impl ReportExtractor {
    pub fn new(backend: Arc<dyn GenerativeBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Extract patient details from report text.
    ///
    /// Missing fields come back as empty strings. Only blank input, a failed
    /// call, or a reply with no parseable JSON object are errors.
    pub async fn extract_details(&self, report_text: &str) -> Result<PatientDetails, ReportError> {
        if report_text.trim().is_empty() {
            return Err(ReportError::EmptyReport);
        }

        let request = GenerateRequest::text(report_prompt(report_text));
        let reply = call_backend(self.backend.as_ref(), &request, self.timeout, "extract_details").await?;

        let payload = parse_json_payload(&reply).map_err(|e| {
            warn!(reply_len = reply.len(), error = %e, "report reply has no usable JSON");
            ReportError::UnparseableResponse { detail: e.to_string() }
        })?;
        let details: PatientDetails = serde_json::from_value(payload)
            .map_err(|e| ReportError::UnparseableResponse { detail: e.to_string() })?;

        let missing = details.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "report extraction left fields empty");
        }
        info!(report_len = report_text.len(), "patient details extracted");
        Ok(details)
    }
}
