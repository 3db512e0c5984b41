//! Trait seams for the ConsentLab pipeline.
//!
//! - `GenerativeBackend`: untrusted, metered text generation (may be a
//!   hosted model, or a scripted stand-in in tests)
//! - `ResponseVerifier`:  trusted checker for payloads scraped from replies
//! - `TextLayerReader`:   reads the embedded text layer of a PDF
//!
//! Pipeline components receive these by injection and never construct them.

use async_trait::async_trait;

use consentlab_contracts::{
    backend::{GenerateRequest, GenerateResponse},
    error::BackendError,
    verify::{ResponseSchema, VerificationReport},
};

/// A generative-text service.
///
/// Every call is a metered, non-idempotent-cost request. Components call it
/// at most once per operation and never retry on their own.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for `request`.
    ///
    /// Implementations map every failure (transport, HTTP status, empty
    /// envelope) onto `BackendError`. Timeouts are applied by the caller.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError>;

    /// Short name for logs, e.g. "gemini-2.0-flash-exp".
    fn name(&self) -> &str {
        "backend"
    }
}

/// Validates a parsed JSON payload before it becomes a typed value.
pub trait ResponseVerifier: Send + Sync {
    /// Return a report with `passed = true` when every rule holds, or the
    /// full list of failures otherwise.
    fn verify(&self, payload: &serde_json::Value, schema: &ResponseSchema) -> VerificationReport;
}

/// Reads the text layer of a PDF byte stream. No OCR.
pub trait TextLayerReader: Send + Sync {
    /// Return the concatenated text of every page.
    ///
    /// `Err` carries a human-readable parse failure. An image-only PDF is not
    /// an error here: it yields empty or whitespace-only text.
    fn read_text(&self, pdf: &[u8]) -> Result<String, String>;
}
