//! Scenario 3: Consent Chat
//!
//! The patient reads the simplified summary in their own language and asks
//! questions about the form before signing.
//!
//! Walk-through for the demo run:
//!   1. Summary translated to Hindi; a repeat request is served from memory
//!   2. English needs no translation; Klingon is refused
//!   3. Two questions answered in Hindi, grounded in the form
//!   4. An off-topic question gets the "not sure" answer
//!   5. During a backend outage the chat apologizes instead of failing

use std::sync::Arc;

use consentlab_contracts::{conversation::Conversation, error::ConsentResult};
use consentlab_core::TextSource;

use crate::hospital_pipeline;
use crate::mock_data::{mock_pdf, APPENDECTOMY_CONSENT};
use crate::simulated::SimulatedBackend;

/// Run Scenario 3: Consent Chat.
pub async fn run_scenario() -> ConsentResult<()> {
    println!("=== Scenario 3: Consent Chat ===");
    println!();

    let backend = Arc::new(SimulatedBackend::new());
    let pipeline = hospital_pipeline(backend.clone())?;
    let analyzed = pipeline.process(TextSource::Pdf(mock_pdf(APPENDECTOMY_CONSENT))).await?;
    let summary = &analyzed.assessment.summary;
    let document = analyzed.document.content();

    // ── Translation ───────────────────────────────────────────────────────────

    let translator = pipeline.translator();
    let hindi = translator.translate(summary, "Hindi").await?;
    println!("  Summary (Hindi):   {}", hindi);

    let calls_before = backend.call_count();
    translator.translate(summary, "Hindi").await?;
    translator.translate(summary, "English").await?;
    println!("  Repeat Hindi + English: {} backend call(s)", backend.call_count() - calls_before);

    match translator.translate(summary, "Klingon").await {
        Ok(_) => println!("  Klingon:           unexpectedly translated"),
        Err(e) => println!("  Klingon:           REFUSED ({})", e.reason()),
    }
    println!();

    // ── Questions ─────────────────────────────────────────────────────────────

    let qa = pipeline.qa();
    let mut conversation = Conversation::new();
    for question in ["When can I go home?", "Will I bleed a lot?", "Can I bring my dog to the ward?"] {
        if let Some(turn) = qa.converse(&mut conversation, question, document, "Hindi").await {
            println!("  Patient:   {}", question);
            println!("  Assistant: {}", turn.content);
        }
    }
    println!();

    backend.set_outage(true);
    if let Some(turn) = qa.converse(&mut conversation, "Is the anesthesia safe?", document, "English").await {
        println!("  During outage:     {}", turn.content);
    }
    backend.set_outage(false);

    println!("  Conversation turns: {}", conversation.len());
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
