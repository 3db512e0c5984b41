//! Scenario 2: Scan Consent
//!
//! A printed form is photographed at the bedside and reaches the pipeline as
//! a base64 data URL. Text recognition is delegated to the backend.
//!
//! Walk-through for the demo run:
//!   1. Cataract capture: data URL decoded, text recognized, low risk
//!   2. Malformed capture: rejected locally before any backend call
//!   3. Experimental therapy form: the analysis names a risk level outside
//!      low / medium / high and is rejected rather than guessed

use std::sync::Arc;

use consentlab_contracts::error::ConsentResult;
use consentlab_core::{GenerativeBackend, TextSource};

use crate::hospital_pipeline;
use crate::mock_data::{CATARACT_CAPTURE_DATA_URL, EXPERIMENTAL_THERAPY_CONSENT};
use crate::simulated::SimulatedBackend;

/// Run Scenario 2: Scan Consent.
pub async fn run_scenario() -> ConsentResult<()> {
    println!("=== Scenario 2: Scan Consent ===");
    println!();

    let backend = Arc::new(SimulatedBackend::new());
    let pipeline = hospital_pipeline(backend.clone())?;

    // ── Camera capture ────────────────────────────────────────────────────────

    let source = TextSource::capture(CATARACT_CAPTURE_DATA_URL)?;
    let analyzed = pipeline.process(source).await?;

    println!("  Capture:       cataract consent (camera snapshot)");
    println!("  Recognized:    {} chars via {}", analyzed.document.content().len(), backend.name());
    println!("  Risk level:    {}", analyzed.assessment.risk_level);
    println!("  Summary:       {}", analyzed.assessment.summary);
    println!("  Backend calls: {} (recognize + analyze)", backend.call_count());
    println!();

    // ── Malformed capture ─────────────────────────────────────────────────────

    match TextSource::capture("data:text/plain;base64,SGVsbG8=") {
        Ok(_) => println!("  Malformed capture: unexpectedly accepted"),
        Err(e) => println!("  Malformed capture: REJECTED ({})", e.reason()),
    }
    println!();

    // ── Invalid risk level ────────────────────────────────────────────────────

    match pipeline.analyzer().analyze(EXPERIMENTAL_THERAPY_CONSENT).await {
        Ok(assessment) => println!("  Experimental form: unexpectedly analyzed as {}", assessment.risk_level),
        Err(e) => {
            println!("  Experimental form: REJECTED ({})", e.reason());
            println!("  Message:           {}", e);
        }
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
