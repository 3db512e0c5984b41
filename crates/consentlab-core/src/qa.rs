//! Grounded Q&A Engine.
//!
//! Answers patient questions using only the consent form text. Each call is
//! independent: earlier turns of a conversation are never fed back to the
//! backend. The conversational entry points never fail; any error becomes a
//! scripted apology.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use consentlab_contracts::{
    backend::GenerateRequest,
    conversation::{Conversation, ConversationTurn},
    error::QaError,
    language::Language,
};

use crate::backend::call_backend;
use crate::prompts::question_prompt;
use crate::traits::GenerativeBackend;

/// Shown to the patient whenever an answer cannot be produced.
pub const FALLBACK_ANSWER: &str = "Sorry, I encountered an error. Please try again.";

pub struct QaEngine {
    backend: Arc<dyn GenerativeBackend>,
    timeout: Duration,
}

impl QaEngine {
    pub fn new(backend: Arc<dyn GenerativeBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Answer `question` from `document_text` in `language`.
    ///
    /// Unknown language names fall back to English. Never fails: on any error
    /// the apology in `FALLBACK_ANSWER` is returned instead.
    pub async fn ask(&self, question: &str, document_text: &str, language: &str) -> String {
        match self.try_ask(question, document_text, language).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "question answering degraded to fallback");
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    /// Like `ask`, but reports why an answer could not be produced.
    pub async fn try_ask(
        &self,
        question: &str,
        document_text: &str,
        language: &str,
    ) -> Result<String, QaError> {
        let language = Language::lookup(language).unwrap_or_else(|| {
            debug!(requested = %language, "unknown answer language; using English");
            Language::English
        });

        let request = GenerateRequest::text(question_prompt(question, document_text, language));
        let answer = call_backend(self.backend.as_ref(), &request, self.timeout, "ask").await?;

        if answer.trim().is_empty() {
            return Err(QaError::EmptyResponse);
        }

        info!(
            language = %language,
            question_len = question.len(),
            answer_len = answer.len(),
            "question answered"
        );
        Ok(answer)
    }

    /// Ask within a conversation, recording both turns.
    ///
    /// Blank questions are ignored: no turn is added and `None` is returned.
    /// Otherwise the user turn and then the assistant turn are appended, and
    /// the assistant turn is returned.
    pub async fn converse<'c>(
        &self,
        conversation: &'c mut Conversation,
        question: &str,
        document_text: &str,
        language: &str,
    ) -> Option<&'c ConversationTurn> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        conversation.push(ConversationTurn::user(question));
        let answer = self.ask(question, document_text, language).await;
        Some(conversation.push(ConversationTurn::assistant(answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DEFAULT_TIMEOUT;
    use crate::test_support::{ScriptedBackend, SlowBackend};
    use consentlab_contracts::{conversation::Role, error::BackendError};

    const CONSENT: &str = "You will receive general anesthesia. Recovery takes two weeks.";

    #[tokio::test]
    async fn answer_is_grounded_in_document_and_language() {
        let backend = Arc::new(ScriptedBackend::replying(["आपको दो हफ्ते आराम करना होगा।"]));
        let engine = QaEngine::new(backend.clone(), DEFAULT_TIMEOUT);

        let answer = engine.ask("How long is recovery?", CONSENT, "Hindi").await;
        assert_eq!(answer, "आपको दो हफ्ते आराम करना होगा।");

        let prompt = backend.last_prompt();
        assert!(prompt.contains(CONSENT));
        assert!(prompt.contains("Hindi"));
        assert!(prompt.contains("How long is recovery?"));
    }

    #[tokio::test]
    async fn backend_failure_returns_fallback_literal() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Transport { reason: "dns".into() }));
        let engine = QaEngine::new(backend, DEFAULT_TIMEOUT);
        let answer = engine.ask("Will it hurt?", CONSENT, "English").await;
        assert_eq!(answer, "Sorry, I encountered an error. Please try again.");
    }

    #[tokio::test]
    async fn timeout_returns_fallback() {
        let backend = Arc::new(SlowBackend { delay: Duration::from_millis(500) });
        let engine = QaEngine::new(backend, Duration::from_millis(10));
        assert_eq!(engine.ask("Will it hurt?", CONSENT, "English").await, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn empty_answer_is_reported_by_try_ask() {
        let backend = Arc::new(ScriptedBackend::replying([""]));
        let engine = QaEngine::new(backend, DEFAULT_TIMEOUT);
        let err = engine.try_ask("Will it hurt?", CONSENT, "English").await.unwrap_err();
        assert_eq!(err, QaError::EmptyResponse);
    }

    #[tokio::test]
    async fn unknown_language_falls_back_to_english() {
        let backend = Arc::new(ScriptedBackend::replying(["Yes."]));
        let engine = QaEngine::new(backend.clone(), DEFAULT_TIMEOUT);
        engine.ask("Is it safe?", CONSENT, "Esperanto").await;
        assert!(backend.last_prompt().contains("Answer in English"));
    }

    #[tokio::test]
    async fn converse_appends_user_then_assistant_turn() {
        let backend = Arc::new(ScriptedBackend::replying(["About two weeks."]));
        let engine = QaEngine::new(backend, DEFAULT_TIMEOUT);
        let mut conversation = Conversation::new();

        let turn = engine
            .converse(&mut conversation, "  How long is recovery? ", CONSENT, "English")
            .await
            .unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "About two weeks.");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[0].role, Role::User);
        assert_eq!(conversation.turns()[0].content, "How long is recovery?");
    }

    #[tokio::test]
    async fn converse_ignores_blank_questions() {
        let backend = Arc::new(ScriptedBackend::replying(["unused"]));
        let engine = QaEngine::new(backend.clone(), DEFAULT_TIMEOUT);
        let mut conversation = Conversation::new();

        assert!(engine.converse(&mut conversation, "   ", CONSENT, "English").await.is_none());
        assert!(conversation.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn converse_records_fallback_on_failure() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Blocked { reason: "SAFETY".into() }));
        let engine = QaEngine::new(backend, DEFAULT_TIMEOUT);
        let mut conversation = Conversation::new();

        let turn = engine.converse(&mut conversation, "Why?", CONSENT, "English").await.unwrap();
        assert_eq!(turn.content, FALLBACK_ANSWER);
        assert_eq!(conversation.len(), 2);
    }
}
