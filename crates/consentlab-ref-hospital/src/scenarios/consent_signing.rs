//! Scenario 5: Consent Signing
//!
//! The attending surgeon registers an analyzed consent form for a patient;
//! the patient then signs through DigiLocker and the record is stored.
//!
//! Walk-through for the demo run:
//!   1. Surgeon registers the cataract form; the record is unsigned
//!   2. A malformed Aadhaar number is rejected before any OTP is sent
//!   3. A malformed OTP is rejected; the challenge stays open for a retry
//!   4. The valid OTP signs the record
//!   5. The record is flattened into a store row and read back
//!   6. A second signing attempt is refused

use std::sync::Arc;

use chrono::Utc;

use consentlab_contracts::{
    error::ConsentResult,
    patient::generate_patient_id,
    record::ConsentRecord,
    session::SessionContext,
};

use crate::desk::ConsentDesk;
use crate::hospital_pipeline;
use crate::mock_data::{attending_surgeon, CATARACT_CONSENT};
use crate::signing;
use crate::simulated::SimulatedBackend;

const PATIENT_AADHAAR: &str = "4821 7730 9154";

/// Run Scenario 5: Consent Signing.
pub async fn run_scenario() -> ConsentResult<()> {
    println!("=== Scenario 5: Consent Signing ===");
    println!();

    let backend = Arc::new(SimulatedBackend::new());
    let desk = ConsentDesk::new(Arc::new(hospital_pipeline(backend)?));
    let session = SessionContext::login(attending_surgeon());

    let patient_id = generate_patient_id();
    let mut record = desk
        .register_consent(
            &session,
            &patient_id,
            "Cataract Surgery",
            CATARACT_CONSENT,
            &session.user().full_name,
        )
        .await?;

    println!("  Record:          {}", record.id);
    println!("  Patient ID:      {}", record.patient_id);
    println!("  Risk level:      {}", record.assessment.risk_level);
    println!("  Doctor signed:   {}", record.doctor_signature);
    println!("  Patient signed:  {}", if record.is_signed() { "YES" } else { "NO" });
    println!();

    // ── DigiLocker ceremony ───────────────────────────────────────────────────

    match signing::start("4821 7730") {
        Ok(_) => println!("  Short Aadhaar:   unexpectedly accepted"),
        Err(e) => println!("  Short Aadhaar:   REJECTED ({})", e.reason()),
    }

    let challenge = signing::start(PATIENT_AADHAAR)?;
    println!("  OTP sent to mobile linked to Aadhaar ending {}", challenge.last_four());

    match challenge.verify("48 291", Utc::now()) {
        Ok(_) => println!("  Bad OTP:         unexpectedly accepted"),
        Err(e) => println!("  Bad OTP:         REJECTED ({}), retry allowed", e.reason()),
    }

    let signature = challenge.verify("482913", Utc::now())?;
    record.sign(signature.token, signature.signed_at)?;
    if let Some(signed) = record.patient_signature() {
        println!("  Patient signed:  {} at {}", signed.token, signed.signed_at.to_rfc3339());
    }
    println!();

    // ── Store round trip ──────────────────────────────────────────────────────

    let row = record.to_row();
    let stored = ConsentRecord::try_from(row.clone())?;
    println!("  Stored row:      risk_level={}, signature={}", row.risk_level, row.patient_signature.is_some());
    println!("  Read back:       {}", if stored == record { "IDENTICAL" } else { "DIFFERENT" });

    match signing::sign_record(&mut record, PATIENT_AADHAAR, "482913", Utc::now()) {
        Ok(()) => println!("  Second signing:  unexpectedly accepted"),
        Err(e) => println!("  Second signing:  REFUSED ({})", e.reason()),
    }
    println!();
    let surgeon = session.logout();
    println!("  Logged out:      {}", surgeon.full_name);
    println!();
    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}
