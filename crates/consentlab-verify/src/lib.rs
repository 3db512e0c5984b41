//! # consentlab-verify
//!
//! Payload verification for the ConsentLab pipeline.
//!
//! This crate provides [`engine::SchemaVerifier`], which implements the
//! [`consentlab_core::traits::ResponseVerifier`] trait. It validates JSON
//! payloads scraped from model replies in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: field rules (`RequiredField`, `NonBlankString`)
//!    evaluated against the payload.
//!
//! ```rust,ignore
//! use consentlab_verify::engine::SchemaVerifier;
//!
//! let verifier = Arc::new(SchemaVerifier::new());
//! let pipeline = ConsentPipeline::new(backend, verifier, options);
//! ```

pub mod engine;

pub use engine::SchemaVerifier;
