//! Scenario 4: Patient Intake
//!
//! A consent officer logs in, registers a patient from a referral letter and
//! logs out. The session is an explicit value passed to each operation.
//!
//! Walk-through for the demo run:
//!   1. Session opened for the consent officer
//!   2. Referral letter sent for extraction; the reply omits the age
//!   3. Missing fields reported for manual entry, patient ID issued
//!   4. Blank report refused without a backend call
//!   5. Session closed

use std::sync::Arc;

use consentlab_contracts::{error::ConsentResult, session::SessionContext};

use crate::desk::ConsentDesk;
use crate::hospital_pipeline;
use crate::mock_data::{consent_officer, REFERRAL_REPORT};
use crate::simulated::SimulatedBackend;

/// Run Scenario 4: Patient Intake.
pub async fn run_scenario() -> ConsentResult<()> {
    println!("=== Scenario 4: Patient Intake ===");
    println!();

    let backend = Arc::new(SimulatedBackend::new());
    let desk = ConsentDesk::new(Arc::new(hospital_pipeline(backend.clone())?));

    let session = SessionContext::login(consent_officer());
    println!(
        "  Logged in:      {} ({:?}, {})",
        session.user().full_name,
        session.user().role,
        session.user().hospital_name
    );

    let patient = desk.register_patient(&session, REFERRAL_REPORT).await?;
    let details = &patient.details;
    println!("  Patient ID:     {}", patient.patient_id);
    println!("  Name:           {}", details.patient_name);
    println!("  Gender:         {}", details.gender);
    println!("  Diagnosis:      {}", details.disease);
    println!("  Treatment:      {}", details.treatment_course);
    println!("  Notes:          {}", details.notes);

    let missing = details.missing_fields();
    if missing.is_empty() {
        println!("  Missing fields: none");
    } else {
        println!("  Missing fields: {} (enter manually)", missing.join(", "));
    }
    println!();

    let calls_before = backend.call_count();
    match desk.register_patient(&session, "   ").await {
        Ok(_) => println!("  Blank report:   unexpectedly registered"),
        Err(e) => println!("  Blank report:   REFUSED ({})", e.reason()),
    }
    println!("  Backend calls for blank report: {}", backend.call_count() - calls_before);

    let user = session.logout();
    println!("  Logged out:     {}", user.email);
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
