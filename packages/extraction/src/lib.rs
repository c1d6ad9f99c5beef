//! Author-Affiliation Extraction Library
//!
//! Given a document identifier (a DOI for publisher landing pages, an
//! OAI-style id for repository pages), pick the right extractor plugin for
//! the stored HTML snapshot and return normalized author, affiliation, and
//! abstract data, with a freshness cache in front.
//!
//! # Design
//!
//! - Plugins are leaf logic. All ordering decisions live in the
//!   [`SelectionEngine`].
//! - Publisher pages try publisher-specific plugins first, then generic
//!   ones, and only accept a result that carries at least one affiliation.
//!   A fallback plugin runs when nothing acceptable was produced.
//! - Repository pages take the first plugin that claims the page.
//! - A bot-challenge page aborts dispatch and is never cached.
//! - Cached results are served while younger than the soft TTL, and after
//!   that only if the snapshot has not changed since.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use affiliation_extraction::{
//!     CacheConfig, FreshnessCache, MemoryCacheStore, MemoryDocumentSource, SelectionEngine,
//! };
//!
//! let cache = FreshnessCache::new(
//!     Arc::new(MemoryDocumentSource::new()),
//!     Arc::new(MemoryCacheStore::new()),
//!     Arc::new(SelectionEngine::with_default_plugins()),
//!     CacheConfig::default(),
//! );
//!
//! let resolution = cache.resolve_publisher("10.1007/s00000-000-0000-0", false).await?;
//! println!("{} via {}", resolution.payload.authors.len(), resolution.plugin_name);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams: plugins, snapshot source, cache store, clock
//! - [`types`] - Identifiers, snapshots, payloads, cache entries
//! - [`pipeline`] - Selection engine and freshness cache
//! - [`plugins`] - Bundled extractor plugins and default registries
//! - [`normalize`] - Payload normalization and affiliation resolution
//! - [`sources`] - Snapshot sources (memory, HTTP)
//! - [`stores`] - Cache stores (memory, Postgres)
//! - [`testing`] - Mock implementations for testing

pub mod dom;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod plugins;
pub mod registry;
pub mod sources;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use dom::ParsedDocument;
pub use error::{ExtractionError, PluginError, SourceError};
pub use traits::{
    clock::{Clock, SystemClock},
    extractor::Extractor,
    source::DocumentSource,
    store::CacheStore,
};
pub use types::{
    cache::{CacheEntry, CacheStatus},
    config::{CacheConfig, HttpSourceConfig},
    document::{DocumentClass, DocumentId, DocumentRef, RawDocument, VersionToken},
    payload::{AuthorRecord, ExtractionPayload, Extras},
};

pub use normalize::{normalize_payload, resolve_affiliations, AffId, AffiliationRecord, AuthorRef};
pub use pipeline::{FreshnessCache, Resolution, Selection, SelectionEngine};
pub use registry::{ExtractorRegistry, ExtractorRegistryBuilder};

// Re-export sources and stores
pub use sources::{HttpDocumentSource, MemoryDocumentSource};
pub use stores::MemoryCacheStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresCacheStore;
