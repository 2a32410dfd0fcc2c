//! Live Store
//!
//! Keeps a [`ContentStore`] in sync with its content root:
//! - Initial load on open
//! - Recursive file watching of the root
//! - Full reload on any document change, swapped in as a new snapshot
//!
//! Snapshots are immutable. Readers holding an older snapshot keep seeing
//! exactly what was loaded at that time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{RwLock, broadcast, mpsc};

use crate::error::Result;
use crate::store::{ContentLoader, ContentStore};

/// Capacity of the reload notification channel
const RELOAD_CHANNEL_CAPACITY: usize = 16;

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    ContentChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Notification sent after a successful reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadEvent {
    /// Path whose change triggered the reload
    pub path: PathBuf,
    /// Number of documents in the new snapshot
    pub documents: usize,
}

/// A content store that reloads itself when files change
pub struct LiveStore {
    /// Current snapshot
    current: Arc<RwLock<Arc<ContentStore>>>,
    loader: ContentLoader,
    reloads: broadcast::Sender<ReloadEvent>,
    /// File watcher, dropped with the store
    _watcher: Option<RecommendedWatcher>,
    /// Channel to receive watcher events
    watcher_rx: Option<mpsc::UnboundedReceiver<WatcherEvent>>,
}

impl LiveStore {
    /// Load the initial snapshot
    pub fn open(loader: ContentLoader) -> Result<Self> {
        let store = loader.load()?;
        let (reloads, _) = broadcast::channel(RELOAD_CHANNEL_CAPACITY);

        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
            loader,
            reloads,
            _watcher: None,
            watcher_rx: None,
        })
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// Get the current snapshot
    pub async fn snapshot(&self) -> Arc<ContentStore> {
        self.current.read().await.clone()
    }

    /// Receive a notification after every successful reload
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.reloads.subscribe()
    }

    /// Reload immediately, returning the new document count
    pub async fn reload(&self) -> Result<usize> {
        let root = self.loader.root().to_path_buf();
        Self::reload_snapshot(&self.current, &self.loader, &self.reloads, root).await
    }

    /// Start watching the content root for changes
    pub async fn start_watching(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watcher_rx = Some(rx);

        let filter = self.loader.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let (created, removed) = match event.kind {
                        EventKind::Create(_) => (true, false),
                        EventKind::Remove(_) => (false, true),
                        EventKind::Modify(_) => (false, false),
                        _ => return,
                    };
                    for path in event.paths {
                        // Directories carry no extension but may hold documents
                        let changed = filter.is_document_path(&path)
                            || removed
                            || (created && path.is_dir());
                        if changed {
                            let _ = tx.send(WatcherEvent::ContentChanged(path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher.watch(self.loader.root(), RecursiveMode::Recursive)?;
        self._watcher = Some(watcher);

        self.start_watcher_task();
        log::info!("Watching {} for changes", self.loader.root().display());

        Ok(())
    }

    /// Start the background task that processes file watcher events
    fn start_watcher_task(&mut self) {
        let Some(mut rx) = self.watcher_rx.take() else {
            return;
        };

        let current = self.current.clone();
        let loader = self.loader.clone();
        let reloads = self.reloads.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    WatcherEvent::ContentChanged(mut path) => {
                        // Coalesce a burst of events into one reload
                        while let Ok(next) = rx.try_recv() {
                            match next {
                                WatcherEvent::ContentChanged(p) => path = p,
                                WatcherEvent::WatcherError(e) => {
                                    log::error!("Content watcher error: {}", e)
                                }
                            }
                        }

                        log::info!("Content changed: {}", path.display());
                        if let Err(e) =
                            Self::reload_snapshot(&current, &loader, &reloads, path).await
                        {
                            log::error!("Reload failed, keeping previous snapshot: {}", e);
                        }
                    }
                    WatcherEvent::WatcherError(e) => {
                        log::error!("Content watcher error: {}", e);
                    }
                }
            }
            log::debug!("Content watcher stopped");
        });
    }

    /// Load a fresh store off the async runtime and swap it in
    async fn reload_snapshot(
        current: &RwLock<Arc<ContentStore>>,
        loader: &ContentLoader,
        reloads: &broadcast::Sender<ReloadEvent>,
        path: PathBuf,
    ) -> Result<usize> {
        let loader = loader.clone();
        let store = tokio::task::spawn_blocking(move || loader.load()).await??;

        let documents = store.len();
        {
            let mut shared = current.write().await;
            *shared = Arc::new(store);
        }

        // No subscribers is fine
        let _ = reloads.send(ReloadEvent { path, documents });

        Ok(documents)
    }
}
