//! Normalized document text.
//!
//! A `DocumentText` is the only form in which consent-form content flows past
//! the text source adapter. It cannot be constructed empty.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Where the document text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOrigin {
    /// An uploaded file (PDF text layer, or an uploaded image).
    Upload,
    /// A scanned page recognized by the backend.
    Scan,
    /// A camera snapshot recognized by the backend.
    Capture,
}

/// The raw extracted text of a consent form.
///
/// Deserialization goes through [`DocumentText::new`], so stored text obeys
/// the same non-empty rule as freshly extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDocumentText")]
pub struct DocumentText {
    content: String,
    origin: TextOrigin,
}

#[derive(Deserialize)]
struct StoredDocumentText {
    content: String,
    origin: TextOrigin,
}

impl TryFrom<StoredDocumentText> for DocumentText {
    type Error = ExtractionError;

    fn try_from(stored: StoredDocumentText) -> Result<Self, Self::Error> {
        Self::new(stored.content, stored.origin)
    }
}

impl DocumentText {
    /// Wrap extracted text, rejecting empty or whitespace-only content.
    ///
    /// Upload origins fail with `NoTextLayer`; scan and capture origins fail
    /// with `NoRecognizedText`.
    pub fn new(content: impl Into<String>, origin: TextOrigin) -> Result<Self, ExtractionError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(match origin {
                TextOrigin::Upload => ExtractionError::NoTextLayer,
                TextOrigin::Scan | TextOrigin::Capture => ExtractionError::NoRecognizedText,
            });
        }
        Ok(Self { content, origin })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> TextOrigin {
        self.origin
    }

    pub fn into_content(self) -> String {
        self.content
    }
}
