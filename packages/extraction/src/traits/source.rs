//! Document source trait: the versioned snapshot store.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::types::document::{DocumentRef, RawDocument, VersionToken};

/// Versioned store of archived landing-page snapshots.
///
/// Implementations own their timeouts; the engine imposes none.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the current snapshot.
    ///
    /// Fails with [`SourceError::NotFound`](crate::error::SourceError::NotFound)
    /// when no snapshot exists.
    async fn fetch(&self, reference: &DocumentRef) -> SourceResult<RawDocument>;

    /// Current version of the snapshot, without its content.
    async fn version_of(&self, reference: &DocumentRef) -> SourceResult<VersionToken>;

    /// Source name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
