//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the service
//! boundary can map each failure class onto its own response.

use thiserror::Error;

use crate::types::document::DocumentId;

/// Errors that reach the caller of a resolution.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No snapshot exists for the identifier
    #[error("document not found: {id}")]
    NotFound { id: DocumentId },

    /// No registered plugin produced output for the document
    #[error("no parser found for: {id}")]
    ParserNotFound { id: DocumentId },

    /// The snapshot is a bot-challenge page rather than real content
    #[error("blocked content for {id}: {reason}")]
    BlockedContent { id: DocumentId, reason: String },

    /// Identifier was empty after normalization
    #[error("invalid document id: {raw:?}")]
    InvalidId { raw: String },

    /// Document source failed for a reason other than a missing snapshot
    #[error("document source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Cache store operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExtractionError {
    /// Short machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ParserNotFound { .. } => "parser_not_found",
            Self::BlockedContent { .. } => "blocked_content",
            Self::InvalidId { .. } => "invalid_id",
            Self::Source(_) => "source_unavailable",
            Self::Storage(_) => "storage",
        }
    }
}

/// Errors raised by a single extractor plugin.
///
/// `Failed` is always recovered by the selection engine; `Blocked` aborts
/// dispatch for the whole document.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The page is a bot-challenge wall
    #[error("blocked: {reason}")]
    Blocked { reason: String },

    /// Any other plugin failure
    #[error("plugin failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked {
            reason: reason.into(),
        }
    }

    /// Wrap a plain message as a recoverable failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into().into())
    }
}

/// Errors raised by a [`DocumentSource`](crate::traits::source::DocumentSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// No snapshot exists for the identifier
    #[error("no snapshot for: {id}")]
    NotFound { id: DocumentId },

    /// Backing store unreachable, timed out, or returned garbage
    #[error("document source unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<SourceError> for ExtractionError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { id } => ExtractionError::NotFound { id },
            SourceError::Unavailable(inner) => ExtractionError::Source(inner),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for plugin calls.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Result type alias for document source calls.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
