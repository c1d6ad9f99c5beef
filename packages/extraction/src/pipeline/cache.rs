//! Freshness-aware result cache.
//!
//! Wraps the selection engine so extraction reruns only when the snapshot
//! may have changed. A cached entry is reused when any of these hold, in
//! order of cost:
//!
//! 1. it was cached within the soft TTL;
//! 2. the snapshot version it was built from is itself within the soft TTL;
//! 3. the document source reports no newer version (one network call).
//!
//! Anything else recomputes and overwrites the entry. Store and
//! version-check failures degrade to a miss; only the fetch and the
//! dispatch itself can fail a resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::pipeline::select::SelectionEngine;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::source::DocumentSource;
use crate::traits::store::CacheStore;
use crate::types::cache::{CacheEntry, CacheStatus};
use crate::types::config::CacheConfig;
use crate::types::document::{DocumentRef, VersionToken};
use crate::types::payload::ExtractionPayload;

/// Outcome of resolving one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub reference: DocumentRef,
    pub plugin_name: String,
    pub payload: ExtractionPayload,

    /// Version of the snapshot the payload was built from
    pub version: VersionToken,

    pub cache: CacheStatus,
}

impl Resolution {
    fn from_entry(reference: &DocumentRef, entry: CacheEntry, cache: CacheStatus) -> Self {
        Self {
            reference: reference.clone(),
            plugin_name: entry.plugin_name,
            payload: entry.payload,
            version: entry.version,
            cache,
        }
    }
}

/// Selection engine behind a two-tier freshness cache.
pub struct FreshnessCache {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn CacheStore>,
    engine: Arc<SelectionEngine>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl FreshnessCache {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn CacheStore>,
        engine: Arc<SelectionEngine>,
        config: CacheConfig,
    ) -> Self {
        Self {
            source,
            store,
            engine,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the clock (tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    /// Resolve a publisher landing page by raw identifier.
    pub async fn resolve_publisher(&self, raw_id: &str, bypass_cache: bool) -> Result<Resolution> {
        self.resolve(&DocumentRef::publisher(raw_id)?, bypass_cache)
            .await
    }

    /// Resolve a repository page by raw identifier.
    pub async fn resolve_repository(&self, raw_id: &str, bypass_cache: bool) -> Result<Resolution> {
        self.resolve(&DocumentRef::repository(raw_id)?, bypass_cache)
            .await
    }

    /// Resolve a document, reusing the cached payload when it is still fresh.
    ///
    /// With `bypass_cache` the read path is skipped entirely; the fresh
    /// result still overwrites the cached entry.
    pub async fn resolve(&self, reference: &DocumentRef, bypass_cache: bool) -> Result<Resolution> {
        let key = reference.cache_key();

        if bypass_cache {
            debug!(id = %reference.id, "Cache bypass requested");
            return self.compute(reference, &key, CacheStatus::Bypassed).await;
        }

        if let Some(entry) = self.lookup(&key).await {
            let now = self.clock.now();
            if let Some(status) = self.freshness(reference, &entry, now).await {
                if status == CacheStatus::Verified {
                    self.save(&key, &entry.touched(now)).await;
                }
                debug!(id = %reference.id, cache = ?status, "Cache hit");
                return Ok(Resolution::from_entry(reference, entry, status));
            }
        }

        self.compute(reference, &key, CacheStatus::Computed).await
    }

    /// Decide whether `entry` can be served. `None` means stale.
    async fn freshness(
        &self,
        reference: &DocumentRef,
        entry: &CacheEntry,
        now: DateTime<Utc>,
    ) -> Option<CacheStatus> {
        let ttl = self.config.soft_ttl;

        if now - entry.cached_at < ttl {
            return Some(CacheStatus::Warm);
        }

        if now - entry.version.as_instant() < ttl {
            return Some(CacheStatus::RecentVersion);
        }

        match self.source.version_of(reference).await {
            Ok(current) if entry.version >= current => Some(CacheStatus::Verified),
            Ok(current) => {
                info!(
                    id = %reference.id,
                    cached = %entry.version.as_instant(),
                    current = %current.as_instant(),
                    "Cached entry is stale"
                );
                None
            }
            Err(e) => {
                warn!(id = %reference.id, error = %e, "Version check failed, treating entry as stale");
                None
            }
        }
    }

    async fn compute(&self, reference: &DocumentRef, key: &str, status: CacheStatus) -> Result<Resolution> {
        let doc = self.source.fetch(reference).await?;
        let version = doc.version;
        let selection = self.engine.run(&doc)?;

        let entry = CacheEntry::new(
            reference.id.clone(),
            version,
            self.clock.now(),
            selection.plugin_name.clone(),
            selection.payload.clone(),
        );
        self.save(key, &entry).await;

        Ok(Resolution {
            reference: reference.clone(),
            plugin_name: selection.plugin_name,
            payload: selection.payload,
            version,
            cache: status,
        })
    }

    async fn lookup(&self, key: &str) -> Option<CacheEntry> {
        match self.store.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn save(&self, key: &str, entry: &CacheEntry) {
        if let Err(e) = self.store.put(key, entry).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }
}
