//! Validation Engine
//!
//! Structural checks over stored documents. Checks only report; they never
//! change a document.

use std::fmt;

use serde::Serialize;

use crate::core::{Document, slugify};
use crate::store::ContentStore;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// A diagnostic message for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub document: String,
    pub line: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

/// Result of checking one or more documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, document: &str, line: Option<usize>, message: String) {
        self.diagnostics.push(Diagnostic {
            document: document.to_string(),
            line,
            message,
            severity,
        });
    }

    pub fn add_error(&mut self, document: &str, line: Option<usize>, message: String) {
        self.push(Severity::Error, document, line, message);
    }

    pub fn add_warning(&mut self, document: &str, line: Option<usize>, message: String) {
        self.push(Severity::Warning, document, line, message);
    }

    pub fn add_info(&mut self, document: &str, line: Option<usize>, message: String) {
        self.push(Severity::Info, document, line, message);
    }

    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Check a single document
pub fn check_document(document: &Document) -> ValidationResult {
    let mut result = ValidationResult::new();
    let id = document.id.as_str();

    if document.content.trim().is_empty() {
        result.add_error(id, None, "Document is empty".to_string());
        return result;
    }

    if document.lossy {
        result.add_warning(
            id,
            None,
            "Invalid UTF-8 was replaced while reading".to_string(),
        );
    }

    if !document.has_heading_title() {
        result.add_warning(
            id,
            None,
            format!(
                "No top-level heading, title falls back to '{}'",
                document.title
            ),
        );
    } else {
        let expected = slugify(&document.title);
        if document.stem() != expected {
            result.add_info(
                id,
                None,
                format!(
                    "File name '{}' does not match title slug '{}'",
                    document.stem(),
                    expected
                ),
            );
        }
    }

    let extra_titles = document
        .sections
        .iter()
        .filter(|s| document.has_heading_title() && s.level == 1 && !s.nested);
    for section in extra_titles {
        result.add_warning(
            id,
            Some(section.line),
            format!("Additional top-level heading '{}'", section.heading),
        );
    }

    result
}

/// Check every document in a store
///
/// Diagnostics are ordered by document identifier, then line.
pub fn check_store(store: &ContentStore) -> ValidationResult {
    let mut documents: Vec<&Document> = store.documents().collect();
    documents.sort_by(|a, b| a.id.cmp(&b.id));

    let mut result = ValidationResult::new();
    for document in documents {
        let mut doc_result = check_document(document);
        doc_result.diagnostics.sort_by_key(|d| d.line);
        result.diagnostics.extend(doc_result.diagnostics);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid());

        result.add_warning("a.md", None, "Test warning".to_string());
        assert!(result.is_valid()); // Warnings don't make it invalid

        result.add_error("a.md", Some(2), "Test error".to_string());
        assert!(!result.is_valid()); // Errors make it invalid
        assert_eq!(result.count(Severity::Error), 1);
        assert_eq!(result.count(Severity::Warning), 1);
    }

    #[test]
    fn test_clean_document() {
        let doc = Document::parse("blog/sunday_brunch.md", "# Sunday Brunch\n\n## Menu\n\nEggs.\n");
        let result = check_document(&doc);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let doc = Document::parse("blog/empty.md", "  \n\n");
        let result = check_document(&doc);

        assert!(!result.is_valid());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_title_heading() {
        let doc = Document::parse("blog/untitled.md", "Just text.\n");
        let result = check_document(&doc);

        assert!(result.is_valid());
        assert_eq!(result.count(Severity::Warning), 1);
        assert!(result.diagnostics[0].message.contains("untitled"));
    }

    #[test]
    fn test_empty_heading_counts_as_missing_title() {
        let doc = Document::parse("blog/real_name.md", "# \n\nBody text.\n");
        let result = check_document(&doc);

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
        assert!(result.diagnostics[0].message.contains("No top-level heading"));
        assert_eq!(result.count(Severity::Info), 0);
    }

    #[test]
    fn test_quoted_heading_is_not_an_additional_title() {
        let doc = Document::parse("blog/real_title.md", "> # Someone Else Said\n\n# Real Title\n");
        let result = check_document(&doc);

        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_slug_mismatch_is_info() {
        let doc = Document::parse("blog/draft-3.md", "# Final Title\n");
        let result = check_document(&doc);

        assert_eq!(result.count(Severity::Info), 1);
        assert!(result.diagnostics[0].message.contains("final_title"));
    }

    #[test]
    fn test_additional_top_level_heading_has_line() {
        let doc = Document::parse("blog/two_titles.md", "# Two Titles\n\ntext\n\n# Second\n");
        let result = check_document(&doc);

        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].line, Some(5));
    }

    #[test]
    fn test_lossy_document_warns() {
        let mut doc = Document::parse("blog/lossy.md", "# Lossy\n");
        doc.lossy = true;
        let result = check_document(&doc);
        assert_eq!(result.count(Severity::Warning), 1);
    }

    #[test]
    fn test_check_store_orders_by_document() {
        let store: ContentStore = vec![
            Document::parse("b.md", ""),
            Document::parse("a.md", "no heading"),
        ]
        .into_iter()
        .collect();

        let result = check_store(&store);
        let ids: Vec<&str> = result.diagnostics.iter().map(|d| d.document.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "b.md"]);
        assert!(!result.is_valid());
    }
}
