//! End-to-end catalog behaviour against an in-memory transport
//!
//! Run with:
//! ```bash
//! cargo test --test catalog_tests
//! ```

use scriptdeck_core::{
    filter, Catalog, CatalogStatus, CategoryFilter, CoreError, EntryId, FetchResponse,
    MemoryTransport, PathState, SourceConfig,
};
use std::sync::Arc;
use std::time::Duration;

const META: &str = "https://raw.test/owner/repo/master/metadata.json";
const BASE: &str = "https://raw.test/owner/repo/master/";

const METADATA: &str = r#"{
    "Core": {
        "foo": {"title": "Foo", "filename": "foo.lua"},
        "spawn": {"title": "Spawn Protection", "description": "Gives players a brief shield after respawn"}
    },
    "Mini Games": {
        "tag": {"title": "Tag", "shortDescription": "Classic tag", "description": "One player is it", "filename": "tag_v2.lua"}
    }
}"#;

fn setup() -> (Arc<MemoryTransport>, Catalog) {
    let transport = Arc::new(
        MemoryTransport::new()
            .with_text(META, METADATA)
            .with_text(format!("{}sapp/Core/foo.lua", BASE), "-- lua code"),
    );
    let catalog = Catalog::new(SourceConfig::custom(META, BASE), transport.clone());
    (transport, catalog)
}

#[tokio::test]
async fn test_flatten_one_entry_per_pair_with_defaults() {
    let (_, catalog) = setup();
    catalog.reload().await;

    let entries = catalog.entries();
    assert_eq!(entries.len(), 3);

    let spawn = catalog.entry(&EntryId::new("Core", "spawn")).unwrap();
    assert_eq!(spawn.title, "Spawn Protection");
    assert_eq!(spawn.filename, "spawn.lua");

    let tag = catalog.entry(&EntryId::new("Mini Games", "tag")).unwrap();
    assert_eq!(tag.summary(), "Classic tag");
}

#[tokio::test]
async fn test_filter_all_and_empty_query_is_identity() {
    let (_, catalog) = setup();
    catalog.reload().await;

    let entries = catalog.entries();
    let out = filter(&entries, "", &CategoryFilter::parse("all"));
    assert_eq!(out.as_slice(), &*entries);
}

#[tokio::test]
async fn test_description_only_match_is_found() {
    let (_, catalog) = setup();
    catalog.reload().await;

    let hits = catalog.search("shield", &CategoryFilter::All);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "spawn");
    assert!(!hits[0].title.to_lowercase().contains("shield"));
}

#[tokio::test]
async fn test_get_resolves_known_content() {
    let (_, catalog) = setup();
    catalog.reload().await;

    let text = catalog.content(&EntryId::new("Core", "foo")).await.unwrap();
    assert_eq!(&*text, "-- lua code");
}

#[tokio::test]
async fn test_get_twice_fetches_once() {
    let (transport, catalog) = setup();
    catalog.reload().await;
    let id = EntryId::new("Core", "foo");
    let url = format!("{}sapp/Core/foo.lua", BASE);

    let first = catalog.content(&id).await.unwrap();
    let second = catalog.content(&id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls(&url), 1);
}

#[tokio::test]
async fn test_concurrent_view_copy_download_share_one_fetch() {
    let transport = Arc::new(
        MemoryTransport::new()
            .with_delay(Duration::from_millis(30))
            .with_text(META, METADATA)
            .with_text(format!("{}sapp/Core/foo.lua", BASE), "-- lua code"),
    );
    let catalog = Arc::new(Catalog::new(
        SourceConfig::custom(META, BASE),
        transport.clone(),
    ));
    catalog.reload().await;

    let id = EntryId::new("Core", "foo");
    let (a, b, c) = tokio::join!(
        catalog.content(&id),
        catalog.content(&id),
        catalog.content(&id)
    );

    assert_eq!(&*a.unwrap(), "-- lua code");
    assert_eq!(&*b.unwrap(), "-- lua code");
    assert_eq!(&*c.unwrap(), "-- lua code");
    assert_eq!(transport.calls(&format!("{}sapp/Core/foo.lua", BASE)), 1);
}

#[tokio::test]
async fn test_metadata_404_keeps_previous_index() {
    let (transport, catalog) = setup();
    assert!(catalog.reload().await.is_success());

    transport.insert(
        META,
        FetchResponse {
            status: 404,
            body: "404: Not Found".into(),
        },
    );

    let err = catalog.index().load().await.unwrap_err();
    assert!(matches!(err, CoreError::MetadataUnavailable { .. }));

    let report = catalog.reload().await;
    assert_eq!(report.error.as_deref().map(|e| e.contains("HTTP 404")), Some(true));
    assert!(matches!(catalog.status(), CatalogStatus::Stale { entries: 3, .. }));
    assert_eq!(catalog.search("foo", &CategoryFilter::All).len(), 1);
    assert!(catalog.content(&EntryId::new("Core", "foo")).await.is_ok());
}

#[tokio::test]
async fn test_content_failure_then_retry() {
    let (transport, catalog) = setup();
    catalog.reload().await;

    let id = EntryId::new("Mini Games", "tag");
    let entry = catalog.entry(&id).unwrap();
    let url = format!("{}sapp/Mini Games/tag_v2.lua", BASE);

    let err = catalog.content(&id).await.unwrap_err();
    assert!(matches!(err, CoreError::ContentUnavailable { .. }));
    assert_eq!(catalog.content_cache().state(&entry), PathState::Failed);

    transport.insert(url.clone(), FetchResponse::ok("-- tag"));
    assert_eq!(&*catalog.content(&id).await.unwrap(), "-- tag");
    assert_eq!(catalog.content_cache().state(&entry), PathState::Cached);
    assert_eq!(transport.calls(&url), 2);
}

#[tokio::test]
async fn test_reload_swaps_whole_index() {
    let (transport, catalog) = setup();
    catalog.reload().await;

    transport.insert(META, FetchResponse::ok(r#"{"Other": {"solo": {}}}"#));
    catalog.reload().await;

    let cats: Vec<_> = catalog.categories().into_iter().map(|c| c.name).collect();
    assert_eq!(cats, vec!["Other".to_string()]);
    assert!(catalog.entry(&EntryId::new("Core", "foo")).is_err());
}
