//! Locating structured payloads inside free-text model replies.
//!
//! Models wrap JSON in prose or code fences. Everything from the leftmost
//! `{` to the last `}` is treated as the payload; nothing else in the reply
//! is parsed. All JSON scraping in the workspace goes through this module.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// The greedy `{...}` span of `text`, if any.
pub fn locate_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the greedy `{...}` span of `text`.
///
/// A span that parses is always a JSON object, since it is delimited by
/// braces.
pub fn parse_json_payload(text: &str) -> Result<Value, PayloadError> {
    let span = locate_json_span(text).ok_or(PayloadError::NoJsonObject)?;
    serde_json::from_str(span).map_err(|e| PayloadError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prose_around_object_is_ignored() {
        let text = "Here is the analysis:\n```json\n{\"riskLevel\": \"low\"}\n```\nHope this helps!";
        let value = parse_json_payload(text).unwrap();
        assert_eq!(value["riskLevel"], "low");
    }

    #[test]
    fn span_is_greedy_across_nested_objects() {
        let text = r#"result {"a": {"b": 1}, "c": [ {"d": 2} ]} done"#;
        assert_eq!(locate_json_span(text), Some(r#"{"a": {"b": 1}, "c": [ {"d": 2} ]}"#));
    }

    #[test]
    fn missing_braces_is_no_object() {
        assert_eq!(parse_json_payload("I cannot help with that."), Err(PayloadError::NoJsonObject));
        assert_eq!(parse_json_payload("} backwards {"), Err(PayloadError::NoJsonObject));
    }

    #[test]
    fn two_objects_in_prose_fail_to_parse() {
        let err = parse_json_payload(r#"{"a": 1} and also {"b": 2}"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }
}
