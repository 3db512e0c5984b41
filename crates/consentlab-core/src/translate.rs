//! Translator: renders an analysis summary in another supported language.
//!
//! Only the summary is ever translated. English returns the input untouched
//! without calling the backend.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use consentlab_contracts::{backend::GenerateRequest, error::TranslationError, language::Language};

use crate::backend::call_backend;
use crate::prompts::translation_prompt;
use crate::traits::GenerativeBackend;

/// Translations already produced in this process, keyed by summary digest and
/// target language. Entries are never evicted.
#[derive(Debug, Default)]
pub struct TranslationMemo {
    entries: Mutex<HashMap<(String, Language), String>>,
}

impl TranslationMemo {
    fn key(summary: &str, language: Language) -> (String, Language) {
        (hex::encode(Sha256::digest(summary.as_bytes())), language)
    }

    pub fn get(&self, summary: &str, language: Language) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(&Self::key(summary, language)).cloned()
    }

    pub fn insert(&self, summary: &str, language: Language, translation: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(Self::key(summary, language), translation);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Translator {
    backend: Arc<dyn GenerativeBackend>,
    enabled: BTreeSet<Language>,
    memo: Option<TranslationMemo>,
    timeout: Duration,
}

impl Translator {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        enabled: impl IntoIterator<Item = Language>,
        cache: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            enabled: enabled.into_iter().collect(),
            memo: cache.then(TranslationMemo::default),
            timeout,
        }
    }

    pub fn enabled_languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.enabled.iter().copied()
    }

    /// Resolve `target_language` (a name or code) to an enabled language.
    pub fn resolve(&self, target_language: &str) -> Result<Language, TranslationError> {
        Language::lookup(target_language)
            .filter(|language| self.enabled.contains(language))
            .ok_or_else(|| TranslationError::UnsupportedLanguage { language: target_language.to_string() })
    }

    /// Translate `summary` into `target_language`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedLanguage` when the language is unknown or not enabled
    ///   (the backend is not called)
    /// - `Backend` when the call fails or times out
    /// - `EmptyResponse` when the backend answers with blank text
    pub async fn translate(&self, summary: &str, target_language: &str) -> Result<String, TranslationError> {
        let language = self.resolve(target_language).inspect_err(|_| {
            warn!(language = %target_language, "translation requested for unsupported language");
        })?;

        if language.is_english() {
            debug!("English requested; returning summary unchanged");
            return Ok(summary.to_string());
        }

        if let Some(hit) = self.memo.as_ref().and_then(|m| m.get(summary, language)) {
            debug!(language = %language, "translation served from memo");
            return Ok(hit);
        }

        let request = GenerateRequest::text(translation_prompt(summary, language));
        let reply = call_backend(self.backend.as_ref(), &request, self.timeout, "translate").await?;

        if reply.trim().is_empty() {
            warn!(language = %language, "translation reply was empty");
            return Err(TranslationError::EmptyResponse);
        }

        if let Some(memo) = &self.memo {
            memo.insert(summary, language, reply.clone());
        }

        info!(language = %language, summary_len = summary.len(), translation_len = reply.len(), "summary translated");
        Ok(reply)
    }
}
