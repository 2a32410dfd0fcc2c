//! Error types for content store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or reading the content store.
#[derive(Error, Debug)]
pub enum Error {
    /// No document is stored under the requested identifier.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The content root does not exist or is not a directory.
    #[error("content root is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// I/O error while reading a file.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("failed to walk content root: {0}")]
    Walk(#[from] walkdir::Error),

    /// File watcher could not be set up.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Background reload task panicked or was cancelled.
    #[error("reload task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the store's Error type.
pub type Result<T> = std::result::Result<T, Error>;
