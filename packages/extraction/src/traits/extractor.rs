//! The extractor plugin contract.
//!
//! Every publisher or repository rule set implements [`Extractor`]. The
//! selection engine calls the three methods in order:
//!
//! 1. [`detects`](Extractor::detects) - cheap applicability check
//!    (hostname, canonical link, publisher meta tag). May report a
//!    bot-challenge page via [`PluginError::Blocked`].
//! 2. [`has_extractable_content`](Extractor::has_extractable_content) -
//!    presence check, only when `detects` returned true.
//! 3. [`extract`](Extractor::extract) - the actual extraction. Any
//!    [`PluginError::Failed`] means "this candidate failed", never
//!    "the request failed".

use crate::dom::ParsedDocument;
use crate::error::PluginResult;
use crate::types::payload::ExtractionPayload;

/// A self-contained extraction rule set.
pub trait Extractor: Send + Sync {
    /// Stable plugin name, reported in response metadata and logs.
    fn name(&self) -> &str;

    /// Whether this plugin encodes rules for one specific platform.
    ///
    /// Publisher-specific plugins are tried before generic matchers.
    fn is_publisher_specific(&self) -> bool;

    /// Whether this plugin's rules apply to the page at all.
    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool>;

    /// Whether the page carries the content this plugin extracts.
    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool;

    /// Extract authors, affiliations, and abstract.
    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload>;
}
