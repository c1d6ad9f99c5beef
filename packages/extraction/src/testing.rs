//! Testing utilities including mock implementations.
//!
//! These let applications exercise dispatch and caching without real
//! snapshots or real plugins.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

use crate::dom::ParsedDocument;
use crate::error::{PluginError, PluginResult, SourceError, SourceResult};
use crate::sources::MemoryDocumentSource;
use crate::traits::clock::Clock;
use crate::traits::extractor::Extractor;
use crate::traits::source::DocumentSource;
use crate::types::document::{DocumentRef, RawDocument, VersionToken};
use crate::types::payload::{AuthorRecord, ExtractionPayload};

/// Record of a call made to a [`MockExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockExtractorCall {
    Detects,
    HasContent,
    Extract,
}

#[derive(Debug, Clone)]
enum DetectBehavior {
    Match,
    NoMatch,
    Blocked(String),
    Fail(String),
}

#[derive(Debug, Clone)]
enum ExtractBehavior {
    Return(ExtractionPayload),
    Blocked(String),
    Fail(String),
}

/// A configurable extractor plugin.
///
/// Detects every page, has content, and returns an empty payload unless
/// configured otherwise. Clones share call history, so a test can keep a
/// clone after registering the plugin.
///
/// # Example
///
/// ```rust
/// use affiliation_extraction::testing::MockExtractor;
/// use affiliation_extraction::{AuthorRecord, ExtractionPayload};
///
/// let plugin = MockExtractor::specific("springer").returning(ExtractionPayload::new(vec![
///     AuthorRecord::new("Ada Lovelace").with_affiliation("University of London"),
/// ]));
/// assert_eq!(plugin.extract_calls(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockExtractor {
    name: String,
    publisher_specific: bool,
    detect: DetectBehavior,
    has_content: bool,
    extract: ExtractBehavior,
    calls: Arc<RwLock<Vec<MockExtractorCall>>>,
}

impl MockExtractor {
    fn new(name: impl Into<String>, publisher_specific: bool) -> Self {
        Self {
            name: name.into(),
            publisher_specific,
            detect: DetectBehavior::Match,
            has_content: true,
            extract: ExtractBehavior::Return(ExtractionPayload::default()),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A publisher-specific plugin.
    pub fn specific(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// A generic, opportunistic plugin.
    pub fn generic(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Return this payload from `extract`.
    pub fn returning(mut self, payload: ExtractionPayload) -> Self {
        self.extract = ExtractBehavior::Return(payload);
        self
    }

    /// Fail `extract` with a recoverable error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.extract = ExtractBehavior::Fail(message.into());
        self
    }

    /// Report a bot-challenge from `extract`.
    pub fn blocked_on_extract(mut self, reason: impl Into<String>) -> Self {
        self.extract = ExtractBehavior::Blocked(reason.into());
        self
    }

    /// Report a bot-challenge from `detects`.
    pub fn blocked_on_detect(mut self, reason: impl Into<String>) -> Self {
        self.detect = DetectBehavior::Blocked(reason.into());
        self
    }

    /// Fail `detects` with a recoverable error.
    pub fn failing_on_detect(mut self, message: impl Into<String>) -> Self {
        self.detect = DetectBehavior::Fail(message.into());
        self
    }

    /// Do not detect any page.
    pub fn not_detecting(mut self) -> Self {
        self.detect = DetectBehavior::NoMatch;
        self
    }

    /// Report no extractable content.
    pub fn without_content(mut self) -> Self {
        self.has_content = false;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockExtractorCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn detect_calls(&self) -> usize {
        self.count(MockExtractorCall::Detects)
    }

    pub fn has_content_calls(&self) -> usize {
        self.count(MockExtractorCall::HasContent)
    }

    pub fn extract_calls(&self) -> usize {
        self.count(MockExtractorCall::Extract)
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn count(&self, kind: MockExtractorCall) -> usize {
        self.calls.read().unwrap().iter().filter(|c| **c == kind).count()
    }

    fn record(&self, call: MockExtractorCall) {
        self.calls.write().unwrap().push(call);
    }
}

impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_publisher_specific(&self) -> bool {
        self.publisher_specific
    }

    fn detects(&self, _doc: &ParsedDocument) -> PluginResult<bool> {
        self.record(MockExtractorCall::Detects);
        match &self.detect {
            DetectBehavior::Match => Ok(true),
            DetectBehavior::NoMatch => Ok(false),
            DetectBehavior::Blocked(reason) => Err(PluginError::blocked(reason.clone())),
            DetectBehavior::Fail(message) => Err(PluginError::failed(message.clone())),
        }
    }

    fn has_extractable_content(&self, _doc: &ParsedDocument) -> bool {
        self.record(MockExtractorCall::HasContent);
        self.has_content
    }

    fn extract(&self, _doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        self.record(MockExtractorCall::Extract);
        match &self.extract {
            ExtractBehavior::Return(payload) => Ok(payload.clone()),
            ExtractBehavior::Blocked(reason) => Err(PluginError::blocked(reason.clone())),
            ExtractBehavior::Fail(message) => Err(PluginError::failed(message.clone())),
        }
    }
}

/// A document source that records calls and can fail version checks.
///
/// Clones share snapshots and call history.
#[derive(Clone, Default)]
pub struct MockDocumentSource {
    inner: MemoryDocumentSource,
    fetch_calls: Arc<RwLock<Vec<DocumentRef>>>,
    version_calls: Arc<RwLock<Vec<DocumentRef>>>,
    fail_versions: Arc<RwLock<bool>>,
}

impl MockDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a snapshot.
    pub fn put_snapshot(&self, reference: &DocumentRef, html: &str, modified: DateTime<Utc>) {
        self.inner.put_snapshot(reference, html, modified);
    }

    /// Add or replace a snapshot with a landing URL.
    pub fn put_snapshot_at(&self, reference: &DocumentRef, url: &str, html: &str, modified: DateTime<Utc>) {
        self.inner.insert(
            RawDocument::new(reference.clone(), html.as_bytes().to_vec(), VersionToken::new(modified))
                .with_url(url),
        );
    }

    /// Make every `version_of` call fail with `Unavailable`.
    pub fn fail_version_checks(&self, fail: bool) {
        *self.fail_versions.write().unwrap() = fail;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }

    pub fn version_count(&self) -> usize {
        self.version_calls.read().unwrap().len()
    }

    /// Clear recorded calls.
    pub fn reset_calls(&self) {
        self.fetch_calls.write().unwrap().clear();
        self.version_calls.write().unwrap().clear();
    }
}

#[async_trait]
impl DocumentSource for MockDocumentSource {
    async fn fetch(&self, reference: &DocumentRef) -> SourceResult<RawDocument> {
        self.fetch_calls.write().unwrap().push(reference.clone());
        self.inner.fetch(reference).await
    }

    async fn version_of(&self, reference: &DocumentRef) -> SourceResult<VersionToken> {
        self.version_calls.write().unwrap().push(reference.clone());
        if *self.fail_versions.read().unwrap() {
            return Err(SourceError::Unavailable("version check disabled".into()));
        }
        self.inner.version_of(reference).await
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}

/// A parsed, empty publisher page.
pub fn publisher_doc() -> ParsedDocument {
    ParsedDocument::from_html(
        DocumentRef::publisher("10.1234/test").unwrap(),
        "<html><head><title>Test</title></head><body></body></html>",
    )
}

/// A parsed, empty repository page.
pub fn repository_doc() -> ParsedDocument {
    ParsedDocument::from_html(
        DocumentRef::repository("oai:repo.test:1").unwrap(),
        "<html><head><title>Test</title></head><body></body></html>",
    )
}

/// One author with one affiliation.
pub fn rich_payload(organization: &str) -> ExtractionPayload {
    ExtractionPayload::new(vec![
        AuthorRecord::new("Test Author").with_affiliation(organization)
    ])
}

/// One author without affiliations.
pub fn bare_payload() -> ExtractionPayload {
    ExtractionPayload::new(vec![AuthorRecord::new("Test Author")])
}
