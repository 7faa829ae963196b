//! Script content cache
//!
//! Maps a resolved path (`sapp/{category}/{filename}`) to the script text.
//! Texts are fetched lazily, at most once per path, and kept for the whole
//! session: nothing is evicted or overwritten once cached.
//!
//! Concurrent requests for a path that is already being fetched join the
//! in-flight request (`moka::future::Cache::try_get_with`) instead of
//! issuing another one. Failures are not cached, so a later call retries.
//!
//! Per-path lifecycle: `Unfetched -> Fetching -> Cached` (absorbing) or
//! `Unfetched -> Fetching -> Failed` (retry allowed).

use crate::config::SourceConfig;
use crate::error::CoreError;
use crate::index::error_chain;
use crate::models::Entry;
use crate::transport::Transport;
use dashmap::DashMap;
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observable state of one content path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Unfetched,
    Fetching,
    Cached,
    Failed,
}

#[derive(Debug, Clone)]
enum Slot {
    Fetching,
    Cached(Arc<str>),
    Failed(String),
}

/// Result of [`ContentCache::lookup`]
#[derive(Debug, Clone)]
pub struct ContentHit {
    pub text: Arc<str>,
    /// This call issued the transport request
    pub fetched: bool,
}

/// Lazily-filled, never-evicting script text cache
pub struct ContentCache {
    config: SourceConfig,
    transport: Arc<dyn Transport>,
    /// Canonical store; also coalesces in-flight fetches
    texts: Cache<String, Arc<str>>,
    /// Synchronous view of every path seen so far
    slots: DashMap<String, Slot>,
}

impl ContentCache {
    pub fn new(config: &SourceConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: config.clone(),
            transport,
            // No capacity bound and no expiry: the session owns every text.
            texts: Cache::builder().build(),
            slots: DashMap::new(),
        }
    }

    /// `sapp/{category}/{filename}` (pure)
    pub fn resolve_path(&self, entry: &Entry) -> String {
        resolve_path(&self.config.content_root, entry)
    }

    /// Cached text for an entry, fetching it on first request
    pub async fn get(&self, entry: &Entry) -> Result<Arc<str>, CoreError> {
        self.lookup(entry).await.map(|hit| hit.text)
    }

    /// Like [`get`](Self::get), also telling whether this call did the fetch
    ///
    /// Callers that joined another caller's in-flight fetch, or hit the
    /// cache, get `fetched == false`.
    pub async fn lookup(&self, entry: &Entry) -> Result<ContentHit, CoreError> {
        let path = self.resolve_path(entry);

        if let Some(text) = self.peek_path(&path) {
            debug!(path = %path, "Content cache hit");
            return Ok(ContentHit {
                text,
                fetched: false,
            });
        }

        self.mark(&path, Slot::Fetching);

        let url = self.config.content_url(&path);
        let transport = Arc::clone(&self.transport);
        let mut fetched = false;
        let did_fetch = &mut fetched;
        let fetch = async move {
            *did_fetch = true;
            debug!(url = %url, "Fetching script");
            match transport.fetch(&url).await {
                Ok(response) if response.is_success() => Ok(Arc::<str>::from(response.body)),
                Ok(response) => Err(format!("HTTP {}", response.status)),
                Err(e) => Err(error_chain(&e)),
            }
        };

        let result = self.texts.try_get_with(path.clone(), fetch).await;

        match result {
            Ok(text) => {
                if fetched {
                    info!(path = %path, bytes = text.len(), "Script cached");
                }
                self.mark(&path, Slot::Cached(Arc::clone(&text)));
                Ok(ContentHit { text, fetched })
            }
            Err(reason) => {
                let reason = (*reason).clone();
                warn!(path = %path, %reason, "Script fetch failed");
                self.mark(&path, Slot::Failed(reason.clone()));
                Err(CoreError::ContentUnavailable { path, reason })
            }
        }
    }

    /// Cached text without any I/O
    pub fn peek(&self, entry: &Entry) -> Option<Arc<str>> {
        self.peek_path(&self.resolve_path(entry))
    }

    pub fn state(&self, entry: &Entry) -> PathState {
        match self.slots.get(&self.resolve_path(entry)).as_deref() {
            None => PathState::Unfetched,
            Some(Slot::Fetching) => PathState::Fetching,
            Some(Slot::Cached(_)) => PathState::Cached,
            Some(Slot::Failed(_)) => PathState::Failed,
        }
    }

    /// Reason of the last failed fetch for an entry, if its last fetch failed
    pub fn last_error(&self, entry: &Entry) -> Option<String> {
        match self.slots.get(&self.resolve_path(entry)).as_deref() {
            Some(Slot::Failed(reason)) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Number of paths with cached text
    pub fn cached_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.value(), Slot::Cached(_)))
            .count()
    }

    fn peek_path(&self, path: &str) -> Option<Arc<str>> {
        match self.slots.get(path).as_deref() {
            Some(Slot::Cached(text)) => Some(Arc::clone(text)),
            _ => None,
        }
    }

    /// Record a state change; a cached path never leaves `Cached`
    fn mark(&self, path: &str, slot: Slot) {
        self.slots
            .entry(path.to_string())
            .and_modify(|current| {
                if !matches!(current, Slot::Cached(_)) {
                    *current = slot.clone();
                }
            })
            .or_insert(slot);
    }
}

/// `{root}/{category}/{filename}`
pub fn resolve_path(content_root: &str, entry: &Entry) -> String {
    format!("{}/{}/{}", content_root, entry.category, entry.filename)
}
