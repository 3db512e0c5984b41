//! # consentlab-contracts
//!
//! Shared types, payload contracts, and the error taxonomy for the ConsentLab
//! consent-analysis pipeline.
//!
//! Every crate in the workspace imports from here. Apart from validation and
//! canonicalization at construction time, no business logic lives here.

pub mod assessment;
pub mod backend;
pub mod conversation;
pub mod document;
pub mod error;
pub mod language;
pub mod patient;
pub mod record;
pub mod session;
pub mod verify;
