//! Cached extraction results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{DocumentId, VersionToken};
use super::payload::ExtractionPayload;

/// A stored extraction result.
///
/// `version` is always the version of the snapshot that produced `payload`;
/// entries are replaced whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: DocumentId,
    pub version: VersionToken,
    pub cached_at: DateTime<Utc>,

    /// Plugin that produced the payload
    pub plugin_name: String,

    pub payload: ExtractionPayload,
}

impl CacheEntry {
    pub fn new(
        id: DocumentId,
        version: VersionToken,
        cached_at: DateTime<Utc>,
        plugin_name: impl Into<String>,
        payload: ExtractionPayload,
    ) -> Self {
        Self {
            id,
            version,
            cached_at,
            plugin_name: plugin_name.into(),
            payload,
        }
    }

    /// Copy of this entry with a refreshed `cached_at`.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            cached_at: now,
            ..self.clone()
        }
    }
}

/// How a resolution was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Entry was cached within the soft TTL
    Warm,
    /// Entry's snapshot version itself is within the soft TTL
    RecentVersion,
    /// Backing store confirmed the cached version is current
    Verified,
    /// Miss or stale entry, extraction ran
    Computed,
    /// Caller asked to skip the cache, extraction ran
    Bypassed,
}

impl CacheStatus {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Warm | Self::RecentVersion | Self::Verified)
    }
}
