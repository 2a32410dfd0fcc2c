//! Content Store
//!
//! A read-only store over a directory of Markdown articles.
//!
//! This library provides:
//! - Loading a content root into an immutable store
//! - Lookup by identifier and enumeration of identifiers
//! - Markdown outline parsing (title and sections)
//! - Corpus checks
//! - Live reload on file changes

pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod store;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use crate::core::{Document, slugify};
pub use error::{Error, Result};
pub use parser::{Outline, Section, parse_markdown};
pub use store::{ContentLoader, ContentStore, LiveStore};
pub use validation::{Diagnostic, ValidationResult, check_document, check_store};
