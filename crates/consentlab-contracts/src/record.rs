//! Consent records as the external record store sees them.
//!
//! The pipeline never reads or writes the store itself. It produces the
//! `RiskAssessment` and `DocumentText` that the hosting application combines
//! with identity and signature metadata into a `ConsentRecord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    assessment::{RiskAssessment, RiskLevel},
    error::RecordError,
};

/// A completed patient signing ceremony: the opaque token and when it was
/// attached. Held as one value so a signature can never exist without its
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSignature {
    pub token: String,
    pub signed_at: DateTime<Utc>,
}

/// A consent form linked to a patient, with its analysis and signature state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRecord {
    pub id: Uuid,
    /// Hospital patient identifier, e.g. "CNLB-7QX2M4PA".
    pub patient_id: String,
    /// Procedure or template name, e.g. "Laparoscopic Appendectomy".
    pub form_type: String,
    pub content: String,
    pub assessment: RiskAssessment,
    pub doctor_signature: String,
    patient_signature: Option<PatientSignature>,
}

impl ConsentRecord {
    /// Assemble a new, unsigned record. The doctor signature is mandatory.
    pub fn create(
        patient_id: impl Into<String>,
        form_type: impl Into<String>,
        content: impl Into<String>,
        assessment: RiskAssessment,
        doctor_signature: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let doctor_signature = doctor_signature.into();
        if doctor_signature.trim().is_empty() {
            return Err(RecordError::MissingDoctorSignature);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.into(),
            form_type: form_type.into(),
            content: content.into(),
            assessment,
            doctor_signature,
            patient_signature: None,
        })
    }

    pub fn patient_signature(&self) -> Option<&PatientSignature> {
        self.patient_signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.patient_signature.is_some()
    }

    /// Attach the patient's signature token. A record is signed at most once.
    pub fn sign(&mut self, token: impl Into<String>, signed_at: DateTime<Utc>) -> Result<(), RecordError> {
        if self.is_signed() {
            return Err(RecordError::AlreadySigned { id: self.id.to_string() });
        }
        self.patient_signature = Some(PatientSignature { token: token.into(), signed_at });
        Ok(())
    }

    /// Flatten into the store's row shape.
    pub fn to_row(&self) -> ConsentRow {
        ConsentRow {
            id: self.id,
            patient_id: self.patient_id.clone(),
            form_type: self.form_type.clone(),
            content: self.content.clone(),
            summary: self.assessment.summary.clone(),
            risk_level: self.assessment.risk_level.as_str().to_string(),
            risk_factors: self.assessment.risk_factors.clone(),
            doctor_signature: self.doctor_signature.clone(),
            patient_signature: self.patient_signature.as_ref().map(|s| s.token.clone()),
            signed_at: self.patient_signature.as_ref().map(|s| s.signed_at),
        }
    }
}

/// The `consent_forms` row as stored externally.
///
/// Signature columns are independently nullable here; converting into a
/// `ConsentRecord` enforces that they agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRow {
    pub id: Uuid,
    pub patient_id: String,
    pub form_type: String,
    pub content: String,
    pub summary: String,
    pub risk_level: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub doctor_signature: String,
    pub patient_signature: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ConsentRow> for ConsentRecord {
    type Error = RecordError;

    fn try_from(row: ConsentRow) -> Result<Self, Self::Error> {
        let patient_signature = match (row.patient_signature, row.signed_at) {
            (None, None) => None,
            (Some(token), Some(signed_at)) => Some(PatientSignature { token, signed_at }),
            _ => return Err(RecordError::SignatureStateMismatch),
        };

        if row.doctor_signature.trim().is_empty() {
            return Err(RecordError::MissingDoctorSignature);
        }

        let risk_level: RiskLevel = row
            .risk_level
            .parse()
            .map_err(|_| RecordError::InvalidRiskLevel { value: row.risk_level.clone() })?;

        Ok(Self {
            id: row.id,
            patient_id: row.patient_id,
            form_type: row.form_type,
            content: row.content,
            assessment: RiskAssessment {
                summary: row.summary,
                risk_level,
                risk_factors: row.risk_factors,
            },
            doctor_signature: row.doctor_signature,
            patient_signature,
        })
    }
}
