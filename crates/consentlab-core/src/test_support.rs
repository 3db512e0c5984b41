//! Hand-written trait doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use consentlab_contracts::{
    backend::{GenerateRequest, GenerateResponse},
    error::BackendError,
    verify::{ResponseSchema, VerificationFailure, VerificationReport, VerificationRuleType},
};

use crate::traits::{GenerativeBackend, ResponseVerifier, TextLayerReader};

/// A backend that plays back queued replies and records every request.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<GenerateResponse, BackendError>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedBackend {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|r| Ok(GenerateResponse::new(r))))
    }

    pub fn failing(err: BackendError) -> Self {
        Self::scripted([Err(err)])
    }

    pub fn scripted(replies: impl IntoIterator<Item = Result<GenerateResponse, BackendError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.requests.lock().unwrap().last().map(|r| r.prompt.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Malformed { reason: "script exhausted".into() }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A backend that never answers within a short timeout.
pub struct SlowBackend {
    pub delay: Duration,
}

#[async_trait]
impl GenerativeBackend for SlowBackend {
    async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        tokio::time::sleep(self.delay).await;
        Ok(GenerateResponse::new("too late"))
    }
}

/// A verifier that checks only the field-level rules, without JSON Schema.
pub struct FieldRuleVerifier;

impl ResponseVerifier for FieldRuleVerifier {
    fn verify(&self, payload: &Value, schema: &ResponseSchema) -> VerificationReport {
        let mut failures = vec![];
        for rule in &schema.rules {
            let (path, ok) = match &rule.rule_type {
                VerificationRuleType::RequiredField { field_path } => {
                    (field_path, payload.get(field_path).is_some_and(|v| !v.is_null()))
                }
                VerificationRuleType::NonBlankString { field_path } => (
                    field_path,
                    payload.get(field_path).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty()),
                ),
            };
            if !ok {
                failures.push(VerificationFailure {
                    rule_id: rule.rule_id.clone(),
                    message: format!("field '{path}' failed"),
                });
            }
        }
        VerificationReport { passed: failures.is_empty(), failures }
    }
}

/// A text-layer reader that returns a fixed page text and counts calls.
pub struct FixedTextReader {
    text: Result<String, String>,
    calls: Mutex<u32>,
}

impl FixedTextReader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: Ok(text.into()), calls: Mutex::new(0) }
    }

    pub fn broken(detail: &str) -> Self {
        Self { text: Err(detail.to_string()), calls: Mutex::new(0) }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl TextLayerReader for FixedTextReader {
    fn read_text(&self, _pdf: &[u8]) -> Result<String, String> {
        *self.calls.lock().unwrap() += 1;
        self.text.clone()
    }
}
