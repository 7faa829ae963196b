//! Catalog: the one owned object the presentation layer talks to
//!
//! Bundles the metadata index, the content cache, the event bus and the
//! current status. Built once at startup and shared by `Arc`.

use crate::config::SourceConfig;
use crate::content::ContentCache;
use crate::error::{CatalogStatus, CoreError, LoadReport};
use crate::event::{DataEvent, EventBus};
use crate::index::{CategoryFilter, CategorySummary, MetadataIndex};
use crate::models::{Entry, EntryId};
use crate::transport::{HttpTransport, Transport};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Central catalog for scriptdeck
pub struct Catalog {
    config: SourceConfig,
    index: MetadataIndex,
    content: ContentCache,
    event_bus: EventBus,
    status: RwLock<CatalogStatus>,
}

impl Catalog {
    pub fn new(config: SourceConfig, transport: Arc<dyn Transport>) -> Self {
        let index = MetadataIndex::new(config.metadata_url.clone(), Arc::clone(&transport));
        let content = ContentCache::new(&config, transport);

        Self {
            config,
            index,
            content,
            event_bus: EventBus::new(),
            status: RwLock::new(CatalogStatus::NotLoaded),
        }
    }

    /// Catalog backed by the reqwest transport
    pub fn from_config(config: SourceConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    pub fn content_cache(&self) -> &ContentCache {
        &self.content
    }

    pub fn status(&self) -> CatalogStatus {
        self.status.read().clone()
    }

    /// (Re)load the metadata index
    ///
    /// Failure leaves the previous index in place and flips the status to
    /// `Stale` (or `Unavailable` when nothing was ever loaded).
    pub async fn reload(&self) -> LoadReport {
        let mut report = LoadReport::new();
        let start = Instant::now();

        info!(url = %self.config.metadata_url, "Loading metadata");
        self.event_bus.publish(DataEvent::MetadataLoading);

        let result = self.index.load().await;
        report.elapsed = start.elapsed();
        report.entries = self.index.len();
        report.categories = self.index.categories().len();

        match result {
            Ok(entries) => {
                *self.status.write() = CatalogStatus::Ready {
                    entries: entries.len(),
                    loaded_at: self.index.loaded_at().unwrap_or_else(chrono::Utc::now),
                };
                self.event_bus.publish(DataEvent::MetadataLoaded {
                    entries: entries.len(),
                });
                debug!(elapsed_ms = report.elapsed.as_millis() as u64, "Reload complete");
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(error = %reason, kept = report.entries, "Reload failed");

                *self.status.write() = if self.index.is_empty() {
                    CatalogStatus::Unavailable {
                        reason: reason.clone(),
                    }
                } else {
                    CatalogStatus::Stale {
                        entries: report.entries,
                        reason: reason.clone(),
                    }
                };
                self.event_bus
                    .publish(DataEvent::MetadataFailed(e.user_message()));
                report.error = Some(reason);
            }
        }

        report
    }

    /// Filter the current index
    pub fn search(&self, query: &str, category: &CategoryFilter) -> Vec<Entry> {
        self.index.search(query, category)
    }

    pub fn entries(&self) -> Arc<[Entry]> {
        self.index.entries()
    }

    pub fn categories(&self) -> Vec<CategorySummary> {
        self.index.categories()
    }

    /// Look up an entry in the current index
    pub fn entry(&self, id: &EntryId) -> Result<Entry, CoreError> {
        self.index.find(id).ok_or_else(|| CoreError::EntryNotFound { id: id.to_string() })
    }

    /// Script text for an entry id, fetched on first use
    pub async fn content(&self, id: &EntryId) -> Result<Arc<str>, CoreError> {
        let entry = self.entry(id)?;
        self.content_for(&entry).await
    }

    /// Script text for an entry already in hand
    pub async fn content_for(&self, entry: &Entry) -> Result<Arc<str>, CoreError> {
        let path = self.content.resolve_path(entry);

        match self.content.lookup(entry).await {
            Ok(hit) => {
                if hit.fetched {
                    self.event_bus.publish(DataEvent::ContentCached(path));
                }
                Ok(hit.text)
            }
            Err(e) => {
                let reason = match &e {
                    CoreError::ContentUnavailable { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                self.event_bus
                    .publish(DataEvent::ContentFailed { path, reason });
                Err(e)
            }
        }
    }

    /// The single status line shown to the user
    pub fn status_message(&self) -> String {
        match self.status() {
            CatalogStatus::NotLoaded => "Loading...".to_string(),
            CatalogStatus::Ready { entries, loaded_at } => format!(
                "{} scripts (loaded {})",
                entries,
                loaded_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
            ),
            CatalogStatus::Stale { entries, .. } => {
                format!("Failed to load (showing {} cached scripts)", entries)
            }
            CatalogStatus::Unavailable { .. } => "Failed to load".to_string(),
        }
    }
}
