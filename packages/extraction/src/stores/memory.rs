//! In-memory cache store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::CacheStore;
use crate::types::cache::CacheEntry;

/// In-memory storage for cache entries.
///
/// Useful for testing and single-process deployments. Entries are lost on
/// restart.
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all stored entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{DocumentId, VersionToken};
    use crate::types::payload::{AuthorRecord, ExtractionPayload};
    use chrono::Utc;

    fn entry(plugin: &str) -> CacheEntry {
        CacheEntry::new(
            DocumentId::parse("10.1/x").unwrap(),
            VersionToken::new(Utc::now()),
            Utc::now(),
            plugin,
            ExtractionPayload::new(vec![AuthorRecord::new("A")]),
        )
    }

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryCacheStore::new();
        assert!(store.get("publisher:10.1/x").await.unwrap().is_none());

        store.put("publisher:10.1/x", &entry("first")).await.unwrap();

        let got = store.get("publisher:10.1/x").await.unwrap().unwrap();
        assert_eq!(got.plugin_name, "first");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_whole_entry() {
        let store = MemoryCacheStore::new();
        store.put("k", &entry("first")).await.unwrap();
        store.put("k", &entry("second")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").await.unwrap().unwrap().plugin_name, "second");

        store.clear();
        assert!(store.is_empty());
    }
}
