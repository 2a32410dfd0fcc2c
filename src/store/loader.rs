//! Content Loader
//!
//! Walks a content root and builds a [`ContentStore`] from the Markdown files
//! found under it.

use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::core::Document;
use crate::error::{Error, Result};
use crate::store::ContentStore;

/// File extensions treated as documents by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Loads documents from a directory tree
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the list of document extensions (without leading dots)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether a path has one of the document extensions
    pub fn is_document_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Load every document under the root
    ///
    /// Files that cannot be read are logged and skipped.
    pub fn load(&self) -> Result<ContentStore> {
        if !self.root.is_dir() {
            return Err(Error::InvalidRoot(self.root.clone()));
        }

        let mut store = ContentStore::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() > 0 => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if !entry.file_type().is_file() || !self.is_document_path(entry.path()) {
                continue;
            }

            let Some(id) = identifier_for(&self.root, entry.path()) else {
                log::warn!("Skipping file with non UTF-8 path: {}", entry.path().display());
                continue;
            };

            match Document::read(id, entry.path()) {
                Ok(document) => {
                    log::debug!("Loaded {} ({} bytes)", document.id, document.content.len());
                    store.add_document(document);
                }
                Err(e) => log::warn!("Failed to load document: {}", e),
            }
        }

        log::info!(
            "Loaded {} documents from {}",
            store.len(),
            self.root.display()
        );

        Ok(store)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || (entry.file_type().is_dir() && SKIPPED_DIRS.iter().any(|dir| *dir == name))
}

/// Identifier of a file: its path relative to the root, joined with `/`
pub fn identifier_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
