//! Async resource reading: a value that shows a loading state until a
//! delayed fetch completes.

use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// State of an async resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    /// Fetch in progress
    Loading,
    /// Fetch finished with a value
    Ready(T),
    /// Fetch finished with an error message
    Failed(String),
}

impl<T> Resource<T> {
    /// Returns true while loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    /// Returns the loaded value, if any
    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Drives a [`Resource`] with fetches running on the tokio runtime.
///
/// Each [`load`](Self::load) supersedes the previous one: a fetch that
/// finishes after a newer load started is discarded.
pub struct ResourceLoader<T> {
    state: Arc<Mutex<Resource<T>>>,
    generation: Arc<AtomicU64>,
    notifier: Option<Notifier>,
}

impl<T: Clone + Send + 'static> ResourceLoader<T> {
    /// Creates a loader in the `Loading` state.
    pub fn new() -> Self {
        ResourceLoader {
            state: Arc::new(Mutex::new(Resource::Loading)),
            generation: Arc::new(AtomicU64::new(0)),
            notifier: None,
        }
    }

    /// Calls `notify` whenever a fetch completes.
    #[must_use]
    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier = Some(Arc::new(notify));
        self
    }

    /// Current state
    pub fn state(&self) -> Resource<T> {
        self.state.lock().clone()
    }

    /// Resets to `Loading`, waits `latency`, then runs `fetch`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load<F, Fut>(&self, latency: Duration, fetch: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, String>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.lock() = Resource::Loading;
        tracing::debug!(generation, "resource load started");

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let result = fetch().await;

            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "discarding superseded resource load");
                return;
            }
            *state.lock() = match result {
                Ok(value) => Resource::Ready(value),
                Err(message) => {
                    tracing::warn!(%message, "resource load failed");
                    Resource::Failed(message)
                }
            };
            if let Some(notify) = notifier {
                notify();
            }
        })
    }
}

impl<T: Clone + Send + 'static> Default for ResourceLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("state", &*self.state.lock())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
