//! # consentlab-gemini
//!
//! [`GeminiBackend`] implements [`consentlab_core::traits::GenerativeBackend`]
//! against `POST {endpoint}/v1beta/models/{model}:generateContent`.
//!
//! Request and reply bodies live in [`wire`] as pure functions so they can be
//! tested without a network.

pub mod client;
pub mod wire;

pub use client::GeminiBackend;
