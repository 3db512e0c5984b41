//! Staff-side operations: registering patients and consent forms.
//!
//! Every operation takes the acting staff member's `SessionContext`
//! explicitly and logs who acted.

use std::sync::Arc;

use tracing::info;

use consentlab_contracts::{
    error::ConsentResult,
    patient::{generate_patient_id, PatientDetails},
    record::ConsentRecord,
    session::SessionContext,
};
use consentlab_core::ConsentPipeline;

/// A patient registered from a medical report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPatient {
    pub patient_id: String,
    pub details: PatientDetails,
}

pub struct ConsentDesk {
    pipeline: Arc<ConsentPipeline>,
}

impl ConsentDesk {
    pub fn new(pipeline: Arc<ConsentPipeline>) -> Self {
        Self { pipeline }
    }

    /// Pre-fill a patient registration from report text and issue an ID.
    pub async fn register_patient(
        &self,
        session: &SessionContext,
        report_text: &str,
    ) -> ConsentResult<RegisteredPatient> {
        let details = self.pipeline.reports().extract_details(report_text).await?;
        let patient_id = generate_patient_id();

        info!(
            staff_id = %session.user().id,
            hospital = %session.user().hospital_name,
            patient_id = %patient_id,
            "patient registered"
        );
        Ok(RegisteredPatient { patient_id, details })
    }

    /// Analyze a consent form and assemble an unsigned record for a patient.
    ///
    /// # Errors
    ///
    /// Analysis failures and a blank doctor signature abort registration;
    /// nothing is assembled.
    pub async fn register_consent(
        &self,
        session: &SessionContext,
        patient_id: &str,
        form_type: &str,
        content: &str,
        doctor_signature: &str,
    ) -> ConsentResult<ConsentRecord> {
        let assessment = self.pipeline.analyzer().analyze(content).await?;
        let record = ConsentRecord::create(patient_id, form_type, content, assessment, doctor_signature)?;

        info!(
            staff_id = %session.user().id,
            staff_role = ?session.user().role,
            record_id = %record.id,
            patient_id = %record.patient_id,
            risk_level = %record.assessment.risk_level,
            "consent form registered"
        );
        Ok(record)
    }
}
