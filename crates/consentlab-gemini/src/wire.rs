//! `generateContent` request and reply bodies.
//!
//! Only the fields ConsentLab reads or writes are modelled; everything else in
//! a reply is ignored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use consentlab_contracts::{backend::GenerateRequest, error::BackendError};

// ── Request ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateContentBody {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: Blob },
}

#[derive(Debug, Serialize)]
pub struct Blob {
    pub mime_type: String,
    /// Base64 of the raw bytes.
    pub data: String,
}

/// The body for one prompt, with the image (if any) after the text part.
pub fn build_body(request: &GenerateRequest) -> GenerateContentBody {
    let mut parts = vec![Part::Text { text: request.prompt.clone() }];
    if let Some(image) = &request.inline_image {
        parts.push(Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.clone(),
                data: STANDARD.encode(&image.bytes),
            },
        });
    }
    GenerateContentBody { contents: vec![Content { parts }] }
}

// ── Reply ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ReplyContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Extract the reply text: every text part of the first candidate, joined.
pub fn parse_reply(body: &str) -> Result<String, BackendError> {
    let reply: GenerateContentReply = serde_json::from_str(body)
        .map_err(|e| BackendError::Malformed { reason: format!("reply is not valid JSON: {e}") })?;

    if let Some(reason) = reply.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked { reason });
    }

    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::Malformed { reason: "reply has no candidates".to_string() })?;

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                BackendError::Blocked { reason: reason.to_string() }
            }
            _ => BackendError::Malformed { reason: "candidate has no text parts".to_string() },
        });
    }

    Ok(texts.concat())
}
