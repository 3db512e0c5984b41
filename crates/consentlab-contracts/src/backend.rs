//! Request and response types for the generative-text backend.
//!
//! One request shape serves every pipeline operation: recognition, analysis,
//! translation, question answering, and report extraction.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Image bytes sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. "image/jpeg".
    pub mime_type: String,
}

impl InlineImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self { bytes, mime_type: mime_type.into() }
    }

    /// A JPEG still, the format browser capture widgets produce by default.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }

    /// Decode a `data:<mime>;base64,<payload>` URL as produced by browser
    /// capture widgets.
    pub fn from_data_url(url: &str) -> Result<Self, ExtractionError> {
        let invalid = |detail: &str| ExtractionError::InvalidDataUrl { detail: detail.to_string() };

        let rest = url.trim().strip_prefix("data:").ok_or_else(|| invalid("missing data: scheme"))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload separator"))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| invalid("payload is not base64"))?;
        if !mime_type.starts_with("image/") {
            return Err(invalid("MIME type is not an image type"));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ExtractionError::InvalidDataUrl { detail: e.to_string() })?;
        if bytes.is_empty() {
            return Err(invalid("image payload is empty"));
        }
        Ok(Self::new(bytes, mime_type))
    }
}

/// "Generate content from a prompt (plus optional inline image)."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub inline_image: Option<InlineImage>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), inline_image: None }
    }

    pub fn with_image(prompt: impl Into<String>, image: InlineImage) -> Self {
        Self { prompt: prompt.into(), inline_image: Some(image) }
    }
}

/// The backend's reply: free text, possibly wrapping a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

impl GenerateResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
