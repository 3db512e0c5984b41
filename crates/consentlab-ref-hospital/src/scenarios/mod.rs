//! Hospital reference runtime demo scenarios.
//!
//! Each scenario is a self-contained module that wires the real ConsentLab
//! pipeline (extraction, analysis, verification, translation, Q&A) to the
//! simulated backend and mock hospital data, and walks through one workflow.

pub mod consent_chat;
pub mod consent_signing;
pub mod patient_intake;
pub mod scan_consent;
pub mod upload_consent;

use consentlab_contracts::error::ConsentResult;

/// Run every scenario in order, stopping at the first failure.
pub async fn run_all() -> ConsentResult<()> {
    upload_consent::run_scenario().await?;
    scan_consent::run_scenario().await?;
    consent_chat::run_scenario().await?;
    patient_intake::run_scenario().await?;
    consent_signing::run_scenario().await?;
    Ok(())
}
