//! Content Store
//!
//! Loading, lookup and live reload of the document corpus.

pub mod live;
pub mod loader;
pub mod registry;

pub use live::{LiveStore, ReloadEvent};
pub use loader::{ContentLoader, DEFAULT_EXTENSIONS};
pub use registry::ContentStore;
