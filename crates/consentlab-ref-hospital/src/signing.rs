//! The patient's DigiLocker signing ceremony.
//!
//! Two steps, enforced by the types: an Aadhaar number starts the ceremony
//! and yields an `OtpChallenge`; a valid OTP completes it and yields a
//! `PatientSignature`. Identity verification itself is external; this module
//! only validates input shape and issues the opaque token.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use consentlab_contracts::{
    error::RecordError,
    record::{ConsentRecord, PatientSignature},
};

const AADHAAR_DIGITS: usize = 12;
const OTP_DIGITS: usize = 6;

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Begin a ceremony with the patient's Aadhaar number.
///
/// Spaces are ignored, so "1234 5678 9012" is accepted.
pub fn start(aadhaar: &str) -> Result<OtpChallenge, RecordError> {
    let digits: String = aadhaar.chars().filter(|c| *c != ' ').collect();
    if !is_digits(&digits, AADHAAR_DIGITS) {
        warn!("signing ceremony rejected a malformed Aadhaar number");
        return Err(RecordError::InvalidAadhaar);
    }
    Ok(OtpChallenge { last_four: digits[AADHAAR_DIGITS - 4..].to_string() })
}

/// A ceremony waiting for the OTP sent to the patient's registered mobile.
#[derive(Debug)]
pub struct OtpChallenge {
    last_four: String,
}

impl OtpChallenge {
    /// The only part of the Aadhaar number that is retained.
    pub fn last_four(&self) -> &str {
        &self.last_four
    }

    /// Complete the ceremony, issuing `DIGILOCKER_<last4>_<unix millis>`.
    ///
    /// A rejected OTP leaves the challenge open for another attempt.
    pub fn verify(&self, otp: &str, at: DateTime<Utc>) -> Result<PatientSignature, RecordError> {
        if !is_digits(otp.trim(), OTP_DIGITS) {
            warn!("signing ceremony rejected a malformed OTP");
            return Err(RecordError::InvalidOtp);
        }
        Ok(PatientSignature {
            token: format!("DIGILOCKER_{}_{}", self.last_four, at.timestamp_millis()),
            signed_at: at,
        })
    }
}

/// Run the whole ceremony and attach the signature to `record`.
pub fn sign_record(
    record: &mut ConsentRecord,
    aadhaar: &str,
    otp: &str,
    at: DateTime<Utc>,
) -> Result<(), RecordError> {
    let signature = start(aadhaar)?.verify(otp, at)?;
    record.sign(signature.token, signature.signed_at)?;
    info!(record_id = %record.id, patient_id = %record.patient_id, "consent record signed");
    Ok(())
}
