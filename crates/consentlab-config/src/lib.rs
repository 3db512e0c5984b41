//! # consentlab-config
//!
//! TOML-driven settings for the ConsentLab pipeline: which backend to call,
//! how long to wait for it, and which languages patients may pick.
//!
//! ```rust,ignore
//! use std::path::Path;
//! use consentlab_config::Settings;
//!
//! let settings = Settings::from_file(Path::new("consentlab.toml"))?;
//! let pipeline = ConsentPipeline::new(backend, verifier, settings.pipeline_options()?);
//! ```
//!
//! A missing section or key takes its default. Unknown keys are rejected so
//! typos surface at startup.

pub mod loader;
pub mod settings;

pub use settings::{BackendSettings, Settings, TranslationSettings};

// ── Tests ─────────────────────────────────────────────────────────────────────
