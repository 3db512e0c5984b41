//! Scenario 1: Upload Consent
//!
//! A consent officer uploads consent forms as PDFs. The text layer is read
//! locally and only the analysis goes to the backend.
//!
//! Walk-through for the demo run:
//!   1. Appendectomy PDF: text layer read, analysis reply wrapped in prose
//!      and a code fence, risk level "Medium" normalized to medium
//!   2. Coronary bypass PDF: high risk with five listed factors
//!   3. Image-only PDF: no text layer, rejected before any backend call

use std::sync::Arc;

use consentlab_contracts::error::ConsentResult;
use consentlab_core::{AnalyzedDocument, TextSource};

use crate::hospital_pipeline;
use crate::mock_data::{mock_pdf, APPENDECTOMY_CONSENT, CORONARY_BYPASS_CONSENT};
use crate::simulated::SimulatedBackend;

fn print_analysis(label: &str, analyzed: &AnalyzedDocument) {
    let assessment = &analyzed.assessment;
    println!("  Form:          {}", label);
    println!("  Text origin:   {:?} ({} chars)", analyzed.document.origin(), analyzed.document.content().len());
    println!("  Risk level:    {}", assessment.risk_level);
    println!("  Summary:       {}", assessment.summary);
    for factor in &assessment.risk_factors {
        println!("    - {}", factor);
    }
    if assessment.is_flagged() {
        println!("  Flagged:       YES (no risk factors listed, review before use)");
    }
    println!();
}

/// Run Scenario 1: Upload Consent.
pub async fn run_scenario() -> ConsentResult<()> {
    println!("=== Scenario 1: Upload Consent ===");
    println!();

    let backend = Arc::new(SimulatedBackend::new());
    let pipeline = hospital_pipeline(backend.clone())?;

    let appendectomy = pipeline.process(TextSource::Pdf(mock_pdf(APPENDECTOMY_CONSENT))).await?;
    print_analysis("Laparoscopic Appendectomy", &appendectomy);

    let bypass = pipeline.process(TextSource::Pdf(mock_pdf(CORONARY_BYPASS_CONSENT))).await?;
    print_analysis("Coronary Artery Bypass Grafting", &bypass);

    let calls_before = backend.call_count();
    match pipeline.process(TextSource::Pdf(mock_pdf("  \n"))).await {
        Ok(_) => println!("  Image-only PDF: unexpectedly analyzed"),
        Err(e) => {
            println!("  Image-only PDF: REJECTED ({})", e.reason());
            println!("  Message:        {}", e);
        }
    }
    println!("  Backend calls for rejected upload: {}", backend.call_count() - calls_before);
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
