//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use tracing::{debug, info};

use consentlab_config::BackendSettings;
use consentlab_contracts::{
    backend::{GenerateRequest, GenerateResponse},
    error::{BackendError, ConfigError},
};
use consentlab_core::traits::GenerativeBackend;

use crate::wire::{build_body, parse_reply};

/// A `GenerativeBackend` that calls Gemini over HTTPS.
///
/// The API key travels as a query parameter and is never logged. Timeouts are
/// applied by the pipeline, not here.
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// `endpoint` is like `https://generativelanguage.googleapis.com` (a
    /// trailing slash is ignored).
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build from settings, reading the key from the configured variable.
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, ConfigError> {
        let api_key = settings.api_key()?;
        info!(endpoint = %settings.endpoint, model = %settings.model, "gemini backend configured");
        Ok(Self::new(settings.endpoint.clone(), settings.model.clone(), api_key))
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        let body = build_body(request);
        debug!(model = %self.model, parts = body.contents[0].parts.len(), "posting generateContent");

        let transport = |e: reqwest::Error| BackendError::Transport { reason: e.without_url().to_string() };

        let resp = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(BackendError::Http { status: status.as_u16(), body: text });
        }

        parse_reply(&text).map(GenerateResponse::new)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_trims_trailing_slash_and_names_model() {
        let backend = GeminiBackend::new("https://example.test/", "gemini-2.0-flash-exp", "k");
        assert_eq!(
            backend.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
        assert_eq!(backend.name(), "gemini-2.0-flash-exp");
    }

    #[test]
    fn from_settings_requires_api_key() {
        let settings = BackendSettings {
            api_key_env: "CONSENTLAB_GEMINI_TEST_MISSING_KEY".to_string(),
            ..BackendSettings::default()
        };
        std::env::remove_var("CONSENTLAB_GEMINI_TEST_MISSING_KEY");
        assert!(GeminiBackend::from_settings(&settings).is_err());
    }
}
