//! Core Types
//!
//! The document model and the title slug rule.

pub mod document;
pub mod slug;

pub use document::Document;
pub use slug::slugify;
