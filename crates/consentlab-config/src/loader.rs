//! Loading and validating `Settings`.
//!
//! A document is validated as soon as it is parsed, so a `Settings` returned
//! from `from_toml_str` or `from_file` is always usable. Settings built in code
//! are validated again by `pipeline_options`.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use consentlab_contracts::error::ConfigError;
use consentlab_core::PipelineOptions;

use crate::settings::Settings;

impl Settings {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `ConfigError` if the TOML is malformed, has unknown keys, or
    /// fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(s).map_err(|e| {
            warn!(error = %e, "settings document rejected");
            ConfigError::new(format!("failed to parse settings TOML: {e}"))
        })?;
        settings.validate()?;
        debug!(model = %settings.backend.model, "settings loaded");
        Ok(settings)
    }

    /// Read the file at `path` and parse it as a settings document.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("failed to read settings file '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::new("backend.timeout_secs must be greater than zero"));
        }
        if self.backend.endpoint.trim().is_empty() {
            return Err(ConfigError::new("backend.endpoint must not be empty"));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::new("backend.model must not be empty"));
        }
        if self.backend.api_key_env.trim().is_empty() {
            return Err(ConfigError::new("backend.api_key_env must not be empty"));
        }
        self.translation.languages()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    /// The knobs `ConsentPipeline` is built with.
    pub fn pipeline_options(&self) -> Result<PipelineOptions, ConfigError> {
        self.validate()?;
        Ok(PipelineOptions {
            timeout: self.timeout(),
            enabled_languages: self.translation.languages()?,
            translation_cache: self.translation.cache,
        })
    }
}
