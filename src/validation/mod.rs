//! Validation Engine
//!
//! Corpus checks kept separate from parsing and storage.

pub mod engine;

pub use engine::{Diagnostic, Severity, ValidationResult, check_document, check_store};
