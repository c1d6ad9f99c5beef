//! Strategy selection: choosing the plugin whose output is used.
//!
//! Publisher pages run a trial-and-reject loop:
//!
//! 1. Ask every plugin whether it detects the page, in registry order.
//!    Publisher-specific detectors form group A, generic ones group B.
//! 2. Walk A then B. Skip plugins without extractable content. Run
//!    `extract`; a plugin failure moves on to the next candidate, a
//!    bot-challenge aborts everything. Accept the first payload where at
//!    least one author has an affiliation.
//! 3. Fall back to the registry's generic extractor.
//!
//! Repository pages take the first detecting plugin, no questions asked.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dom::ParsedDocument;
use crate::error::{ExtractionError, PluginError, Result};
use crate::normalize::normalize_payload;
use crate::registry::ExtractorRegistry;
use crate::traits::extractor::Extractor;
use crate::types::document::{DocumentClass, RawDocument};
use crate::types::payload::ExtractionPayload;

/// The plugin chosen for a document and what it extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub plugin_name: String,
    pub payload: ExtractionPayload,
}

impl Selection {
    fn new(plugin: &dyn Extractor, payload: ExtractionPayload) -> Self {
        Self {
            plugin_name: plugin.name().to_string(),
            payload,
        }
    }
}

/// Runs plugin dispatch for both document classes.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    publisher: ExtractorRegistry,
    repository: ExtractorRegistry,
}

impl SelectionEngine {
    pub fn new(publisher: ExtractorRegistry, repository: ExtractorRegistry) -> Self {
        debug_assert_eq!(publisher.class(), DocumentClass::Publisher);
        debug_assert_eq!(repository.class(), DocumentClass::Repository);
        Self {
            publisher,
            repository,
        }
    }

    /// Engine with every bundled plugin registered.
    pub fn with_default_plugins() -> Self {
        Self::new(
            crate::plugins::publisher_registry(),
            crate::plugins::repository_registry(),
        )
    }

    pub fn publisher_registry(&self) -> &ExtractorRegistry {
        &self.publisher
    }

    pub fn repository_registry(&self) -> &ExtractorRegistry {
        &self.repository
    }

    /// Parse a raw snapshot and select a plugin for it.
    pub fn run(&self, raw: &RawDocument) -> Result<Selection> {
        let doc = ParsedDocument::parse(raw);
        self.run_parsed(&doc)
    }

    /// Select a plugin for an already parsed document.
    pub fn run_parsed(&self, doc: &ParsedDocument) -> Result<Selection> {
        match doc.reference().class {
            DocumentClass::Publisher => self.select_publisher(doc),
            DocumentClass::Repository => self.select_repository(doc),
        }
    }

    fn select_publisher(&self, doc: &ParsedDocument) -> Result<Selection> {
        let id = &doc.reference().id;

        let mut specific: Vec<&Arc<dyn Extractor>> = Vec::new();
        let mut generic: Vec<&Arc<dyn Extractor>> = Vec::new();
        for plugin in self.publisher.plugins() {
            if detects(plugin.as_ref(), doc)? {
                if plugin.is_publisher_specific() {
                    specific.push(plugin);
                } else {
                    generic.push(plugin);
                }
            }
        }

        let specific_names: Vec<&str> = specific.iter().map(|p| p.name()).collect();
        let generic_names: Vec<&str> = generic.iter().map(|p| p.name()).collect();
        debug!(id = %id, specific = ?specific_names, generic = ?generic_names, "Candidate plugins");

        for plugin in specific.into_iter().chain(generic) {
            if !plugin.has_extractable_content(doc) {
                debug!(id = %id, plugin = plugin.name(), "No extractable content");
                continue;
            }

            let Some(payload) = extract(plugin.as_ref(), doc)? else {
                continue;
            };

            if payload.has_any_affiliation() {
                info!(id = %id, plugin = plugin.name(), authors = payload.authors.len(), "Selected plugin");
                return Ok(Selection::new(plugin.as_ref(), payload));
            }

            debug!(id = %id, plugin = plugin.name(), "Extraction has no affiliations, trying next");
        }

        if let Some(fallback) = self.publisher.fallback() {
            if fallback.has_extractable_content(doc) {
                if let Some(payload) = extract(fallback.as_ref(), doc)? {
                    info!(id = %id, plugin = fallback.name(), "Selected fallback plugin");
                    return Ok(Selection::new(fallback.as_ref(), payload));
                }
            }
        }

        info!(id = %id, "No plugin produced output");
        Err(ExtractionError::ParserNotFound { id: id.clone() })
    }

    fn select_repository(&self, doc: &ParsedDocument) -> Result<Selection> {
        let id = &doc.reference().id;

        for plugin in self.repository.plugins() {
            if !detects(plugin.as_ref(), doc)? {
                continue;
            }

            info!(id = %id, plugin = plugin.name(), "Selected repository plugin");
            return match extract(plugin.as_ref(), doc)? {
                Some(payload) => Ok(Selection::new(plugin.as_ref(), payload)),
                None => Err(ExtractionError::ParserNotFound { id: id.clone() }),
            };
        }

        info!(id = %id, "No repository plugin detected the page");
        Err(ExtractionError::ParserNotFound { id: id.clone() })
    }
}

/// Run `detects`, turning a bot-challenge into a request error and any
/// other failure into "not detected".
fn detects(plugin: &dyn Extractor, doc: &ParsedDocument) -> Result<bool> {
    match plugin.detects(doc) {
        Ok(detected) => Ok(detected),
        Err(PluginError::Blocked { reason }) => Err(blocked(plugin, doc, reason)),
        Err(PluginError::Failed(e)) => {
            warn!(id = %doc.reference().id, plugin = plugin.name(), error = %e, "Detection failed");
            Ok(false)
        }
    }
}

/// Run `extract` and normalize. `Ok(None)` means this candidate failed and
/// dispatch should move on.
fn extract(plugin: &dyn Extractor, doc: &ParsedDocument) -> Result<Option<ExtractionPayload>> {
    match plugin.extract(doc) {
        Ok(payload) => Ok(Some(normalize_payload(payload))),
        Err(PluginError::Blocked { reason }) => Err(blocked(plugin, doc, reason)),
        Err(PluginError::Failed(e)) => {
            warn!(id = %doc.reference().id, plugin = plugin.name(), error = %e, "Extraction failed");
            Ok(None)
        }
    }
}

fn blocked(plugin: &dyn Extractor, doc: &ParsedDocument, reason: String) -> ExtractionError {
    warn!(id = %doc.reference().id, plugin = plugin.name(), reason = %reason, "Blocked content");
    ExtractionError::BlockedContent {
        id: doc.reference().id.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{publisher_doc, repository_doc, MockExtractor};
    use crate::types::payload::AuthorRecord;

    fn rich(org: &str) -> ExtractionPayload {
        ExtractionPayload::new(vec![AuthorRecord::new("Author").with_affiliation(org)])
    }

    fn bare() -> ExtractionPayload {
        ExtractionPayload::new(vec![AuthorRecord::new("Author")])
    }

    fn publisher_engine(plugins: Vec<MockExtractor>, fallback: Option<MockExtractor>) -> SelectionEngine {
        let mut builder = ExtractorRegistry::builder(DocumentClass::Publisher);
        for plugin in plugins {
            builder = builder.register(plugin);
        }
        if let Some(fallback) = fallback {
            builder = builder.with_fallback(fallback);
        }
        SelectionEngine::new(
            builder.build(),
            ExtractorRegistry::builder(DocumentClass::Repository).build(),
        )
    }

    fn repository_engine(plugins: Vec<MockExtractor>) -> SelectionEngine {
        let mut builder = ExtractorRegistry::builder(DocumentClass::Repository);
        for plugin in plugins {
            builder = builder.register(plugin);
        }
        SelectionEngine::new(
            ExtractorRegistry::builder(DocumentClass::Publisher).build(),
            builder.build(),
        )
    }

    #[test]
    fn test_specific_plugin_preferred_over_earlier_generic() {
        let generic = MockExtractor::generic("generic").returning(rich("G"));
        let specific = MockExtractor::specific("specific").returning(rich("S"));
        let engine = publisher_engine(vec![generic.clone(), specific], None);

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "specific");
        assert_eq!(selection.payload.authors[0].affiliations, vec!["S"]);
        assert_eq!(generic.extract_calls(), 0);
    }

    #[test]
    fn test_affiliation_empty_result_keeps_searching() {
        let degenerate = MockExtractor::specific("degenerate").returning(bare());
        let generic = MockExtractor::generic("generic").returning(rich("G"));
        let engine = publisher_engine(vec![degenerate.clone(), generic], None);

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "generic");
        assert_eq!(degenerate.extract_calls(), 1);
    }

    #[test]
    fn test_failing_plugin_is_skipped() {
        let broken = MockExtractor::specific("broken").failing("selector exploded");
        let working = MockExtractor::specific("working").returning(rich("W"));
        let engine = publisher_engine(vec![broken, working], None);

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "working");
    }

    #[test]
    fn test_blocked_extraction_stops_dispatch() {
        let blocking = MockExtractor::specific("blocking").blocked_on_extract("captcha");
        let later = MockExtractor::specific("later").returning(rich("L"));
        let fallback = MockExtractor::generic("fallback").returning(rich("F"));
        let engine = publisher_engine(vec![blocking, later.clone()], Some(fallback.clone()));

        let err = engine.run_parsed(&publisher_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::BlockedContent { ref reason, .. } if reason == "captcha"));
        assert_eq!(later.extract_calls(), 0);
        assert_eq!(fallback.extract_calls(), 0);
    }

    #[test]
    fn test_blocked_detection_stops_before_any_extraction() {
        let guard = MockExtractor::generic("guard").blocked_on_detect("cloudflare");
        let specific = MockExtractor::specific("specific").returning(rich("S"));
        let engine = publisher_engine(vec![specific.clone(), guard], None);

        let err = engine.run_parsed(&publisher_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::BlockedContent { .. }));
        assert_eq!(specific.extract_calls(), 0);
    }

    #[test]
    fn test_detection_failure_treated_as_no_match() {
        let flaky = MockExtractor::specific("flaky").failing_on_detect("bad url");
        let working = MockExtractor::generic("working").returning(rich("W"));
        let engine = publisher_engine(vec![flaky.clone(), working], None);

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "working");
        assert_eq!(flaky.extract_calls(), 0);
    }

    #[test]
    fn test_plugins_without_content_or_detection_not_extracted() {
        let undetected = MockExtractor::specific("undetected").not_detecting().returning(rich("U"));
        let empty = MockExtractor::specific("empty").without_content().returning(rich("E"));
        let fallback = MockExtractor::generic("fallback").returning(bare());
        let engine = publisher_engine(vec![undetected.clone(), empty.clone()], Some(fallback));

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "fallback");
        assert_eq!(undetected.has_content_calls(), 0);
        assert_eq!(empty.extract_calls(), 0);
    }

    #[test]
    fn test_fallback_accepted_without_affiliations() {
        let degenerate = MockExtractor::specific("degenerate").returning(bare());
        let fallback = MockExtractor::generic("fallback").returning(bare());
        let engine = publisher_engine(vec![degenerate], Some(fallback));

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "fallback");
        assert!(!selection.payload.has_any_affiliation());
    }

    #[test]
    fn test_parser_not_found_when_nothing_produces_output() {
        let fallback = MockExtractor::generic("fallback").without_content();
        let engine = publisher_engine(vec![MockExtractor::specific("bare").returning(bare())], Some(fallback));

        let err = engine.run_parsed(&publisher_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::ParserNotFound { .. }));
    }

    #[test]
    fn test_failing_fallback_is_parser_not_found() {
        let fallback = MockExtractor::generic("fallback").failing("boom");
        let engine = publisher_engine(vec![], Some(fallback));

        let err = engine.run_parsed(&publisher_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::ParserNotFound { .. }));
    }

    #[test]
    fn test_payload_normalized_before_acceptance() {
        let whitespace_only = MockExtractor::specific("whitespace").returning(ExtractionPayload::new(vec![
            AuthorRecord::new("A").with_affiliation("   "),
        ]));
        let real = MockExtractor::generic("real").returning(ExtractionPayload::new(vec![
            AuthorRecord::new("A").with_affiliation(" X ").with_corresponding(Some(true)),
            AuthorRecord::new("B"),
        ]));
        let engine = publisher_engine(vec![whitespace_only, real], None);

        let selection = engine.run_parsed(&publisher_doc()).unwrap();

        assert_eq!(selection.plugin_name, "real");
        assert_eq!(selection.payload.authors[0].affiliations, vec!["X"]);
        assert_eq!(selection.payload.authors[1].is_corresponding, Some(false));
    }

    #[test]
    fn test_repository_first_detecting_plugin_wins_unconditionally() {
        let skipped = MockExtractor::generic("skipped").not_detecting().returning(rich("S"));
        let first = MockExtractor::generic("first").without_content().returning(bare());
        let second = MockExtractor::generic("second").returning(rich("R"));
        let engine = repository_engine(vec![skipped, first.clone(), second.clone()]);

        let selection = engine.run_parsed(&repository_doc()).unwrap();

        assert_eq!(selection.plugin_name, "first");
        assert!(!selection.payload.has_any_affiliation());
        assert_eq!(first.has_content_calls(), 0);
        assert_eq!(second.detect_calls(), 0);
    }

    #[test]
    fn test_repository_no_match_is_parser_not_found() {
        let engine = repository_engine(vec![MockExtractor::generic("nope").not_detecting()]);

        let err = engine.run_parsed(&repository_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::ParserNotFound { .. }));
    }

    #[test]
    fn test_repository_plugin_failure_is_parser_not_found() {
        let broken = MockExtractor::generic("broken").failing("boom");
        let later = MockExtractor::generic("later").returning(rich("L"));
        let engine = repository_engine(vec![broken, later.clone()]);

        let err = engine.run_parsed(&repository_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::ParserNotFound { .. }));
        assert_eq!(later.extract_calls(), 0);
    }

    #[test]
    fn test_repository_blocked_detection_propagates() {
        let guard = MockExtractor::generic("guard").blocked_on_detect("challenge");
        let engine = repository_engine(vec![guard]);

        let err = engine.run_parsed(&repository_doc()).unwrap_err();

        assert!(matches!(err, ExtractionError::BlockedContent { .. }));
    }
}
