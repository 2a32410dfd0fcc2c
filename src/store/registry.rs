//! Content Store
//!
//! Read-only in-memory lookup table of documents keyed by identifier.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::Document;
use crate::error::{Error, Result};

/// In-memory document store
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    documents: HashMap<String, Document>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document while building the store
    ///
    /// Stored documents are never replaced; returns false if the identifier
    /// is already taken.
    pub fn add_document(&mut self, document: Document) -> bool {
        if self.documents.contains_key(&document.id) {
            log::warn!("Duplicate document identifier ignored: {}", document.id);
            return false;
        }
        self.documents.insert(document.id.clone(), document);
        true
    }

    /// Get a document by exact identifier
    pub fn get(&self, id: &str) -> Result<&Document> {
        self.documents.get(id).ok_or_else(|| Error::not_found(id))
    }

    /// List all identifiers, in no particular order
    pub fn list_identifiers(&self) -> Vec<&str> {
        self.documents.keys().map(|s| s.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over all documents, in no particular order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Most recently modified documents first
    ///
    /// Documents without a modification time sort last; ties are broken by
    /// identifier so the listing is stable.
    pub fn recent(&self, limit: usize) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self.documents.values().collect();
        docs.sort_by(|a, b| match (a.modified, b.modified) {
            (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });
        docs.truncate(limit);
        docs
    }
}

impl FromIterator<Document> for ContentStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut store = Self::new();
        for document in iter {
            store.add_document(document);
        }
        store
    }
}
