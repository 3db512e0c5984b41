//! Error taxonomy for the ConsentLab pipeline.
//!
//! Each pipeline stage has its own error type so callers can tell a fatal
//! analysis failure apart from a recoverable translation failure. Every
//! variant exposes a stable `reason()` string for logs and UI mapping.
//! `ConsentError` unifies them for callers that drive a whole workflow.

use thiserror::Error;

/// A failed call to the generative-text backend.
///
/// Timeouts share this channel with transport and HTTP failures so callers
/// handle them identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The call did not complete within the configured bound.
    #[error("backend call timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("backend transport failure: {reason}")]
    Transport { reason: String },

    /// The backend answered but the envelope held no usable text.
    #[error("malformed backend response: {reason}")]
    Malformed { reason: String },

    /// The backend refused the prompt.
    #[error("backend blocked the prompt: {reason}")]
    Blocked { reason: String },
}

impl BackendError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http-status",
            Self::Transport { .. } => "transport",
            Self::Malformed { .. } => "malformed-response",
            Self::Blocked { .. } => "blocked",
        }
    }
}

/// No readable text could be obtained from a document source.
///
/// The user must supply a better source; these are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The PDF parsed but its text layer is empty or whitespace-only.
    #[error("the PDF has no readable text layer; ensure the PDF contains readable text")]
    NoTextLayer,

    /// Text recognition on an image returned nothing.
    #[error("no text was recognized in the image")]
    NoRecognizedText,

    /// The PDF could not be parsed at all.
    #[error("the PDF could not be read: {detail}")]
    UnreadablePdf { detail: String },

    /// A captured image was not a well-formed base64 data URL.
    #[error("invalid image data URL: {detail}")]
    InvalidDataUrl { detail: String },

    /// The recognition call to the backend failed.
    #[error("text recognition failed: {0}")]
    Backend(#[from] BackendError),
}

impl ExtractionError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoTextLayer => "no-text-layer",
            Self::NoRecognizedText => "no-recognized-text",
            Self::UnreadablePdf { .. } => "unreadable-pdf",
            Self::InvalidDataUrl { .. } => "invalid-data-url",
            Self::Backend(_) => "backend-failure",
        }
    }
}

/// A document could not be turned into a `RiskAssessment`.
///
/// Terminal for the submission; the user re-submits explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("cannot analyze an empty document")]
    EmptyDocument,

    /// No JSON object could be located in the reply, or it failed to parse.
    #[error("analysis response could not be parsed: {detail}")]
    UnparseableResponse { detail: String },

    /// The JSON parsed but does not have the analysis shape.
    #[error("analysis response failed validation: {}", failures.join("; "))]
    SchemaViolation { failures: Vec<String> },

    /// `riskLevel` is outside low / medium / high.
    #[error("analysis returned an invalid risk level '{value}'")]
    InvalidRiskLevel { value: String },

    #[error("analysis request failed: {0}")]
    Backend(#[from] BackendError),
}

impl AnalysisError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyDocument => "empty-document",
            Self::UnparseableResponse { .. } => "unparseable-response",
            Self::SchemaViolation { .. } => "schema-violation",
            Self::InvalidRiskLevel { .. } => "invalid-risk-level",
            Self::Backend(_) => "backend-failure",
        }
    }
}

/// A summary translation failed. Callers keep the last good summary on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("language '{language}' is not supported")]
    UnsupportedLanguage { language: String },

    #[error("translation returned no text")]
    EmptyResponse,

    #[error("translation request failed: {0}")]
    Backend(#[from] BackendError),
}

impl TranslationError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => "unsupported-language",
            Self::EmptyResponse => "empty-response",
            Self::Backend(_) => "backend-failure",
        }
    }
}

/// A question could not be answered.
///
/// Only ever observed through `QaEngine::try_ask`; the conversational entry
/// point downgrades it to a scripted apology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QaError {
    #[error("answer was empty")]
    EmptyResponse,

    #[error("question request failed: {0}")]
    Backend(#[from] BackendError),
}

impl QaError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty-response",
            Self::Backend(_) => "backend-failure",
        }
    }
}

/// Patient details could not be extracted from a medical report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("cannot extract details from an empty report")]
    EmptyReport,

    #[error("report extraction response could not be parsed: {detail}")]
    UnparseableResponse { detail: String },

    #[error("report extraction request failed: {0}")]
    Backend(#[from] BackendError),
}

impl ReportError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyReport => "empty-report",
            Self::UnparseableResponse { .. } => "unparseable-response",
            Self::Backend(_) => "backend-failure",
        }
    }
}

/// A consent record or signing ceremony violated its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("a doctor signature is required to create a consent record")]
    MissingDoctorSignature,

    #[error("consent record {id} is already signed")]
    AlreadySigned { id: String },

    /// Exactly one of patient_signature / signed_at was set.
    #[error("patient signature and signed_at must both be set or both be null")]
    SignatureStateMismatch,

    #[error("Aadhaar number must be exactly 12 digits")]
    InvalidAadhaar,

    #[error("OTP must be exactly 6 digits")]
    InvalidOtp,

    #[error("stored risk level '{value}' is invalid")]
    InvalidRiskLevel { value: String },
}

impl RecordError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingDoctorSignature => "missing-doctor-signature",
            Self::AlreadySigned { .. } => "already-signed",
            Self::SignatureStateMismatch => "signature-state-mismatch",
            Self::InvalidAadhaar => "invalid-aadhaar",
            Self::InvalidOtp => "invalid-otp",
            Self::InvalidRiskLevel { .. } => "invalid-risk-level",
        }
    }
}

/// A settings document is missing, malformed, or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration error: {reason}")]
pub struct ConfigError {
    pub reason: String,
}

impl ConfigError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The unified error type for workflows spanning several pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsentError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConsentError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Extraction(e) => e.reason(),
            Self::Analysis(e) => e.reason(),
            Self::Translation(e) => e.reason(),
            Self::Report(e) => e.reason(),
            Self::Record(e) => e.reason(),
            Self::Config(_) => "config",
        }
    }
}

/// Convenience alias used throughout the ConsentLab crates.
pub type ConsentResult<T> = Result<T, ConsentError>;
