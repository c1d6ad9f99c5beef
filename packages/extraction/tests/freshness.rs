//! Freshness cache over real plugins: snapshot updates, bypass, and errors.

use std::sync::Arc;

use affiliation_extraction::testing::{ManualClock, MockDocumentSource};
use affiliation_extraction::{
    CacheConfig, CacheStatus, CacheStore, DocumentRef, ExtractionError, FreshnessCache,
    MemoryCacheStore, SelectionEngine,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

const SPRINGER_URL: &str = "https://link.springer.com/article/10.1007/s1";

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

fn springer_page(institution: &str) -> String {
    format!(
        r#"<html><head>
        <meta name="citation_author" content="Rosalind Franklin">
        <meta name="citation_author_institution" content="{institution}">
        </head><body></body></html>"#
    )
}

struct Harness {
    cache: FreshnessCache,
    source: MockDocumentSource,
    store: Arc<MemoryCacheStore>,
    clock: ManualClock,
}

fn harness() -> Harness {
    let source = MockDocumentSource::new();
    let store = Arc::new(MemoryCacheStore::new());
    let clock = ManualClock::new(at(1));
    let cache = FreshnessCache::new(
        Arc::new(source.clone()),
        store.clone(),
        Arc::new(SelectionEngine::with_default_plugins()),
        CacheConfig::default(),
    )
    .with_clock(Arc::new(clock.clone()));

    Harness {
        cache,
        source,
        store,
        clock,
    }
}

#[tokio::test]
async fn updated_snapshot_is_picked_up_after_the_soft_ttl() {
    let h = harness();
    let reference = DocumentRef::publisher("10.1007/s1").unwrap();
    h.source
        .put_snapshot_at(&reference, SPRINGER_URL, &springer_page("Birkbeck"), at(1) - Duration::days(30));

    let first = h.cache.resolve_publisher("10.1007/s1", false).await.unwrap();
    assert_eq!(first.cache, CacheStatus::Computed);
    assert_eq!(first.plugin_name, "springer");
    assert_eq!(first.payload.authors[0].affiliations, vec!["Birkbeck"]);

    // Within the TTL the old result is served without asking the source.
    h.source
        .put_snapshot_at(&reference, SPRINGER_URL, &springer_page("King's College London"), at(2));
    h.clock.set(at(1) + Duration::hours(2));
    let warm = h.cache.resolve_publisher("10.1007/s1", false).await.unwrap();
    assert_eq!(warm.cache, CacheStatus::Warm);
    assert_eq!(warm.payload.authors[0].affiliations, vec!["Birkbeck"]);

    // Past the TTL both the entry and its snapshot version are old, the
    // source reports a newer version, so dispatch reruns.
    h.source.reset_calls();
    h.clock.set(at(4));
    let fresh = h.cache.resolve_publisher("10.1007/s1", false).await.unwrap();
    assert_eq!(fresh.cache, CacheStatus::Computed);
    assert_eq!(fresh.payload.authors[0].affiliations, vec!["King's College London"]);
    assert_eq!(h.source.version_count(), 1);
    assert_eq!(h.source.fetch_count(), 1);
}

#[tokio::test]
async fn doi_spellings_share_one_entry() {
    let h = harness();
    let reference = DocumentRef::publisher("10.1007/s1").unwrap();
    h.source
        .put_snapshot_at(&reference, SPRINGER_URL, &springer_page("Birkbeck"), at(1));

    h.cache.resolve_publisher("10.1007/S1", false).await.unwrap();
    let again = h
        .cache
        .resolve_publisher("https://doi.org/10.1007%2Fs1", false)
        .await
        .unwrap();

    assert_eq!(again.cache, CacheStatus::Warm);
    assert_eq!(h.store.len(), 1);
    assert_eq!(h.source.fetch_count(), 1);
}

#[tokio::test]
async fn bypass_recomputes_and_overwrites() {
    let h = harness();
    let reference = DocumentRef::publisher("10.1007/s1").unwrap();
    h.source
        .put_snapshot_at(&reference, SPRINGER_URL, &springer_page("Birkbeck"), at(1));
    h.cache.resolve(&reference, false).await.unwrap();

    h.source
        .put_snapshot_at(&reference, SPRINGER_URL, &springer_page("UCL"), at(1));
    let bypassed = h.cache.resolve(&reference, true).await.unwrap();
    assert_eq!(bypassed.cache, CacheStatus::Bypassed);
    assert_eq!(bypassed.payload.authors[0].affiliations, vec!["UCL"]);

    let stored = h.store.get(&reference.cache_key()).await.unwrap().unwrap();
    assert_eq!(stored.payload.authors[0].affiliations, vec!["UCL"]);
}

#[tokio::test]
async fn blocked_page_is_not_cached() {
    let h = harness();
    let reference = DocumentRef::repository("oai:repo:1").unwrap();
    h.source.put_snapshot(
        &reference,
        "<html><head><title>Just a moment...</title></head></html>",
        at(1),
    );

    let err = h.cache.resolve(&reference, false).await.unwrap_err();

    assert!(matches!(err, ExtractionError::BlockedContent { .. }));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn missing_snapshot_is_not_found() {
    let h = harness();

    let err = h.cache.resolve_repository("oai:missing:1", false).await.unwrap_err();

    assert!(matches!(err, ExtractionError::NotFound { .. }));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn blank_identifier_is_rejected_before_any_lookup() {
    let h = harness();

    let err = h.cache.resolve_publisher("   ", false).await.unwrap_err();

    assert!(matches!(err, ExtractionError::InvalidId { .. }));
    assert_eq!(h.source.fetch_count(), 0);
}
