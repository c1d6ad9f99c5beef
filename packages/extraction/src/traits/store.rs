//! Storage trait for cached extraction results.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::cache::CacheEntry;

/// Keyed store of [`CacheEntry`] values.
///
/// Keys are already normalized by the caller
/// (see [`DocumentRef::cache_key`](crate::types::document::DocumentRef::cache_key)).
/// Writes are whole-entry overwrites; last writer wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the entry stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Store `entry` under `key`, replacing whatever was there.
    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()>;
}
