//! In-memory document source for testing and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{SourceError, SourceResult};
use crate::traits::source::DocumentSource;
use crate::types::document::{DocumentRef, RawDocument, VersionToken};

/// Snapshots held in memory, keyed by document reference.
///
/// Clones share the same snapshots.
#[derive(Clone, Default)]
pub struct MemoryDocumentSource {
    snapshots: Arc<RwLock<HashMap<DocumentRef, RawDocument>>>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a snapshot.
    pub fn insert(&self, doc: RawDocument) {
        self.snapshots
            .write()
            .unwrap()
            .insert(doc.reference.clone(), doc);
    }

    /// Add or replace a snapshot from HTML and a last-modified instant.
    pub fn put_snapshot(&self, reference: &DocumentRef, html: &str, modified: DateTime<Utc>) {
        self.insert(RawDocument::new(
            reference.clone(),
            html.as_bytes().to_vec(),
            VersionToken::new(modified),
        ));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_document(self, doc: RawDocument) -> Self {
        self.insert(doc);
        self
    }

    pub fn remove(&self, reference: &DocumentRef) {
        self.snapshots.write().unwrap().remove(reference);
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, reference: &DocumentRef) -> SourceResult<RawDocument> {
        self.snapshots
            .read()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                id: reference.id.clone(),
            })
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn fetch(&self, reference: &DocumentRef) -> SourceResult<RawDocument> {
        self.get(reference)
    }

    async fn version_of(&self, reference: &DocumentRef) -> SourceResult<VersionToken> {
        self.get(reference).map(|doc| doc.version)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
