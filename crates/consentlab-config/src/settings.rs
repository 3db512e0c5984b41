//! The settings document, as deserialized from TOML.
//!
//! Every section and every key is optional. Example:
//!
//! ```toml
//! [backend]
//! endpoint = "https://generativelanguage.googleapis.com"
//! model = "gemini-2.0-flash-exp"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 30
//!
//! [translation]
//! enabled_languages = ["English", "Hindi", "Tamil"]
//! cache = true
//! ```

use serde::{Deserialize, Serialize};

use consentlab_contracts::{error::ConfigError, language::Language};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub backend: BackendSettings,
    pub translation: TranslationSettings,
}

/// Where and how to reach the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSettings {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never appears in the settings file.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            Ok(_) => Err(ConfigError::new(format!(
                "environment variable '{}' is empty",
                self.api_key_env
            ))),
            Err(e) => Err(ConfigError::new(format!(
                "cannot read API key from '{}': {e}",
                self.api_key_env
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationSettings {
    /// Language names or codes offered to patients.
    pub enabled_languages: Vec<String>,
    /// Memoize translations for the life of the process.
    pub cache: bool,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled_languages: Language::ALL.iter().map(|l| l.name().to_string()).collect(),
            cache: false,
        }
    }
}

impl TranslationSettings {
    /// Resolve the configured names against the language catalogue.
    ///
    /// Rejects unknown names, an empty list, and a list without English.
    /// Duplicates are dropped, keeping first-seen order.
    pub fn languages(&self) -> Result<Vec<Language>, ConfigError> {
        if self.enabled_languages.is_empty() {
            return Err(ConfigError::new("translation.enabled_languages must not be empty"));
        }

        let mut languages = Vec::with_capacity(self.enabled_languages.len());
        for name in &self.enabled_languages {
            let language = Language::lookup(name)
                .ok_or_else(|| ConfigError::new(format!("unknown language '{name}'")))?;
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        if !languages.contains(&Language::English) {
            return Err(ConfigError::new("translation.enabled_languages must include English"));
        }
        Ok(languages)
    }
}
