//! Loading a selected feed into the shared display.
//!
//! Every load takes a ticket when it is initiated. The display only
//! accepts a view whose ticket is newer than the one it shows, so an
//! earlier load that finishes late cannot replace a later selection.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::fetcher::{Entry, FeedSource};
use crate::registry::{FeedRegistry, RegistryError};

/// Rendering-ready content for one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub name: String,
    pub url: String,
    pub entries: Vec<Entry>,
    pub error: Option<String>,
}

/// Receives the views that win the display slot.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &FeedView);
}

/// In-memory display the web layer reads when building the page.
#[derive(Default)]
pub struct FeedDisplay {
    current: RwLock<Option<FeedView>>,
}

impl FeedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<FeedView> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Renderer for FeedDisplay {
    fn render(&self, view: &FeedView) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(view.clone());
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub ticket: u64,
    pub view: FeedView,
    /// False when a newer load had already reached the renderer.
    pub displayed: bool,
}

#[derive(Clone)]
pub struct FeedLoader {
    registry: Arc<RwLock<FeedRegistry>>,
    source: Arc<dyn FeedSource>,
    renderer: Arc<dyn Renderer>,
    issued: Arc<AtomicU64>,
    shown: Arc<Mutex<u64>>,
}

impl FeedLoader {
    pub fn new(
        registry: Arc<RwLock<FeedRegistry>>,
        source: Arc<dyn FeedSource>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            registry,
            source,
            renderer,
            issued: Arc::new(AtomicU64::new(0)),
            shown: Arc::new(Mutex::new(0)),
        }
    }

    /// Starts loading the feed at `index`.
    ///
    /// The lookup happens immediately, so an out-of-range index fails
    /// here without fetching anything. The returned future resolves once
    /// the fetch finished and the view was offered to the renderer; a
    /// failed fetch resolves with an error view instead of hanging.
    pub fn load(
        &self,
        index: usize,
    ) -> Result<impl Future<Output = LoadOutcome> + Send + 'static, RegistryError> {
        let feed = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)?
            .clone();
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let source = Arc::clone(&self.source);
        let renderer = Arc::clone(&self.renderer);
        let shown = Arc::clone(&self.shown);

        Ok(async move {
            let fetched = source.fetch(&feed.url).await;
            let view = match fetched {
                Ok(entries) => FeedView {
                    name: feed.name,
                    url: feed.url,
                    entries,
                    error: None,
                },
                Err(e) => {
                    warn!("Failed to load feed '{}': {}", feed.name, e);
                    FeedView {
                        name: feed.name,
                        url: feed.url,
                        entries: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };

            let displayed = {
                let mut shown = shown.lock().unwrap_or_else(PoisonError::into_inner);
                if ticket > *shown {
                    *shown = ticket;
                    renderer.render(&view);
                    true
                } else {
                    false
                }
            };

            if displayed {
                info!("Displaying '{}' ({} entries)", view.name, view.entries.len());
            } else {
                info!("Discarding stale load of '{}'", view.name);
            }

            LoadOutcome {
                ticket,
                view,
                displayed,
            }
        })
    }

    /// Runs [`load`](Self::load) on the runtime and hands the outcome to
    /// `on_complete`.
    pub fn spawn_load<F>(&self, index: usize, on_complete: F) -> Result<JoinHandle<()>, RegistryError>
    where
        F: FnOnce(LoadOutcome) + Send + 'static,
    {
        let pending = self.load(index)?;
        Ok(tokio::spawn(async move {
            on_complete(pending.await);
        }))
    }
}
