//! Metadata index
//!
//! Loads the remote `metadata.json`, flattens `category -> key -> attributes`
//! into an ordered list of [`Entry`], and answers search/filter queries over
//! the current snapshot.
//!
//! The snapshot is an `Arc<[Entry]>` behind a `parking_lot::RwLock`: readers
//! clone the `Arc`, a successful load swaps it whole. A failed load never
//! touches it.

use crate::error::CoreError;
use crate::models::{Entry, EntryId, RawMetadata};
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Value of the category selector that means "every category"
pub const ALL_CATEGORIES: &str = "all";

/// Category selector for [`filter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) selects everything, anything else is an exact name
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_CATEGORIES),
            CategoryFilter::Only(name) => write!(f, "{}", name),
        }
    }
}

/// One category and how many entries it holds
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

/// Flatten a parsed document into entries, applying attribute defaults
///
/// Order follows the document: categories in order, keys in order within
/// each category.
pub fn flatten(raw: &RawMetadata) -> Vec<Entry> {
    let mut out = Vec::with_capacity(raw.entry_count());

    for (category, records) in &raw.categories {
        for (key, record) in records {
            out.push(Entry {
                category: category.clone(),
                key: key.clone(),
                title: non_empty(record.title.as_deref())
                    .unwrap_or(key.as_str())
                    .to_string(),
                description: record.description.clone().unwrap_or_default(),
                short_description: record.short_description.clone().unwrap_or_default(),
                filename: non_empty(record.filename.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}.lua", key)),
            });
        }
    }

    out
}

/// Keep entries in `category` whose title, description or filename contains `query`
///
/// Case-insensitive, no ranking: input order is preserved. An empty (or
/// all-whitespace) query keeps every entry of the selected category.
pub fn filter(entries: &[Entry], query: &str, category: &CategoryFilter) -> Vec<Entry> {
    let query_lower = query.trim().to_lowercase();

    entries
        .iter()
        .filter(|e| category.matches(&e.category))
        .filter(|e| {
            query_lower.is_empty()
                || e.title.to_lowercase().contains(&query_lower)
                || e.description.to_lowercase().contains(&query_lower)
                || e.filename.to_lowercase().contains(&query_lower)
        })
        .cloned()
        .collect()
}

/// Distinct categories in first-seen order, with entry counts
pub fn categories(entries: &[Entry]) -> Vec<CategorySummary> {
    let mut out: Vec<CategorySummary> = Vec::new();

    for entry in entries {
        match out.iter_mut().find(|c| c.name == entry.category) {
            Some(summary) => summary.count += 1,
            None => out.push(CategorySummary {
                name: entry.category.clone(),
                count: 1,
            }),
        }
    }

    out
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Remote-backed index service
pub struct MetadataIndex {
    metadata_url: String,
    transport: Arc<dyn Transport>,
    entries: RwLock<Arc<[Entry]>>,
    loaded_at: RwLock<Option<DateTime<Utc>>>,
}

impl MetadataIndex {
    pub fn new(metadata_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            metadata_url: metadata_url.into(),
            transport,
            entries: RwLock::new(Arc::from(Vec::new())),
            loaded_at: RwLock::new(None),
        }
    }

    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    /// Fetch + parse + swap in a fresh snapshot
    ///
    /// On any failure the previous snapshot stays queryable.
    pub async fn load(&self) -> Result<Arc<[Entry]>, CoreError> {
        let unavailable = |reason: String| CoreError::MetadataUnavailable {
            url: self.metadata_url.clone(),
            reason,
        };

        let response = match self.transport.fetch(&self.metadata_url).await {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %self.metadata_url, error = %e, "Metadata fetch failed");
                return Err(unavailable(error_chain(&e)));
            }
        };

        if !response.is_success() {
            warn!(url = %self.metadata_url, status = response.status, "Metadata fetch rejected");
            return Err(unavailable(format!("HTTP {}", response.status)));
        }

        let raw = RawMetadata::from_json(&response.body).map_err(|reason| {
            warn!(url = %self.metadata_url, %reason, "Metadata document invalid");
            unavailable(reason)
        })?;

        let entries: Arc<[Entry]> = Arc::from(flatten(&raw));

        *self.entries.write() = Arc::clone(&entries);
        *self.loaded_at.write() = Some(Utc::now());

        info!(
            entries = entries.len(),
            categories = raw.categories.len(),
            "Metadata loaded"
        );

        Ok(entries)
    }

    /// Current snapshot (cheap `Arc` clone)
    pub fn entries(&self) -> Arc<[Entry]> {
        Arc::clone(&self.entries.read())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// When the current snapshot was loaded, if ever
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        *self.loaded_at.read()
    }

    pub fn find(&self, id: &EntryId) -> Option<Entry> {
        self.entries.read().iter().find(|e| e.is(id)).cloned()
    }

    /// [`filter`] over the current snapshot
    pub fn search(&self, query: &str, category: &CategoryFilter) -> Vec<Entry> {
        filter(&self.entries(), query, category)
    }

    pub fn categories(&self) -> Vec<CategorySummary> {
        categories(&self.entries())
    }
}

/// Flatten an error and its sources into one line
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    const URL: &str = "https://host/metadata.json";

    fn sample() -> Vec<Entry> {
        let raw = RawMetadata::from_json(
            r#"{
                "Core": {
                    "foo": {"title": "Foo", "description": "Does foo things", "filename": "foo.lua"},
                    "bar": {"description": "Teleports players"}
                },
                "Fun": {
                    "zed": {"title": "Zed", "shortDescription": "zombies", "filename": "zombies_v2.lua"}
                }
            }"#,
        )
        .unwrap();
        flatten(&raw)
    }

    #[test]
    fn test_flatten_applies_defaults() {
        let entries = sample();
        assert_eq!(entries.len(), 3);

        let bar = &entries[1];
        assert_eq!(bar.key, "bar");
        assert_eq!(bar.title, "bar");
        assert_eq!(bar.filename, "bar.lua");
        assert_eq!(bar.short_description, "");

        let zed = &entries[2];
        assert_eq!(zed.category, "Fun");
        assert_eq!(zed.filename, "zombies_v2.lua");
        assert_eq!(zed.description, "");
    }

    #[test]
    fn test_flatten_empty_strings_fall_back() {
        let raw =
            RawMetadata::from_json(r#"{"Core": {"foo": {"title": "", "filename": ""}}}"#).unwrap();
        let entries = flatten(&raw);
        assert_eq!(entries[0].title, "foo");
        assert_eq!(entries[0].filename, "foo.lua");
    }

    #[test]
    fn test_flatten_is_stable_within_a_call() {
        let raw = RawMetadata::from_json(r#"{"B": {"y": {}, "x": {}}, "A": {"z": {}}}"#).unwrap();
        let first: Vec<_> = flatten(&raw).into_iter().map(|e| e.id()).collect();
        let second: Vec<_> = flatten(&raw).into_iter().map(|e| e.id()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], EntryId::new("B", "y"));
    }

    #[test]
    fn test_filter_all_empty_returns_everything_in_order() {
        let entries = sample();
        let out = filter(&entries, "", &CategoryFilter::All);
        assert_eq!(out, entries);
    }

    #[test]
    fn test_filter_category_exact_match() {
        let entries = sample();
        let out = filter(&entries, "", &CategoryFilter::parse("Fun"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, "zed");

        assert!(filter(&entries, "", &CategoryFilter::parse("fun")).is_empty());
        assert_eq!(CategoryFilter::parse("ALL"), CategoryFilter::All);
    }

    #[test]
    fn test_filter_matches_description_and_filename() {
        let entries = sample();

        let out = filter(&entries, "TELEPORT", &CategoryFilter::All);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, "bar");

        let out = filter(&entries, "_v2", &CategoryFilter::All);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, "zed");

        // short description is not searched
        assert!(filter(&entries, "zombies", &CategoryFilter::Only("Core".into())).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let entries = sample();
        let cat = CategoryFilter::Only("Core".into());
        let once = filter(&entries, "o", &cat);
        let twice = filter(&once, "o", &cat);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let cats = categories(&sample());
        assert_eq!(
            cats,
            vec![
                CategorySummary {
                    name: "Core".into(),
                    count: 2
                },
                CategorySummary {
                    name: "Fun".into(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let transport = Arc::new(
            MemoryTransport::new().with_text(URL, r#"{"Core":{"foo":{"title":"Foo"}}}"#),
        );
        let index = MetadataIndex::new(URL, transport.clone());
        assert!(index.is_empty());
        assert!(index.loaded_at().is_none());

        let entries = index.load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(index.len(), 1);
        assert!(index.loaded_at().is_some());

        transport.insert(
            URL,
            crate::transport::FetchResponse::ok(r#"{"Core":{"a":{},"b":{}}}"#),
        );
        index.load().await.unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.find(&EntryId::new("Core", "foo")).is_none());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_index() {
        let transport = Arc::new(
            MemoryTransport::new().with_text(URL, r#"{"Core":{"foo":{"title":"Foo"}}}"#),
        );
        let index = MetadataIndex::new(URL, transport.clone());
        index.load().await.unwrap();

        transport.insert(
            URL,
            crate::transport::FetchResponse {
                status: 404,
                body: String::new(),
            },
        );
        let err = index.load().await.unwrap_err();
        assert!(matches!(err, CoreError::MetadataUnavailable { ref reason, .. } if reason == "HTTP 404"));
        assert_eq!(index.len(), 1);

        transport.insert(URL, crate::transport::FetchResponse::ok("{ broken"));
        assert!(matches!(
            index.load().await,
            Err(CoreError::MetadataUnavailable { .. })
        ));
        assert_eq!(
            index.find(&EntryId::new("Core", "foo")).map(|e| e.title),
            Some("Foo".to_string())
        );
    }
}
