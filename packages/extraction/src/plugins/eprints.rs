//! EPrints repository pages.

use crate::dom::ParsedDocument;
use crate::error::PluginResult;
use crate::normalize::affiliations::{resolve_affiliations, AffiliationRecord, AuthorRef};
use crate::traits::extractor::Extractor;
use crate::types::payload::ExtractionPayload;

pub struct EPrints;

impl Extractor for EPrints {
    fn name(&self) -> &str {
        "eprints"
    }

    fn is_publisher_specific(&self) -> bool {
        true
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        if doc.meta_content("eprints.eprintid").is_some() {
            return Ok(true);
        }
        Ok(doc
            .meta_content("generator")
            .map(|g| g.to_lowercase().contains("eprints"))
            .unwrap_or(false))
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        doc.meta_content("eprints.creators_name").is_some()
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        let authors: Vec<AuthorRef> = doc
            .meta_contents("eprints.creators_name")
            .into_iter()
            .map(AuthorRef::new)
            .collect();
        // EPrints records the depositing institution without linking it to
        // particular creators.
        let institutions: Vec<AffiliationRecord> = doc
            .meta_contents("eprints.institution")
            .into_iter()
            .map(AffiliationRecord::unreferenced)
            .collect();

        let mut payload = ExtractionPayload::new(resolve_affiliations(authors, &institutions));
        payload.abstract_text = doc.meta_content("eprints.abstract");
        payload.extras.published_date = doc.meta_content("eprints.date");
        payload.extras.genre = doc.meta_content("eprints.type");

        Ok(payload)
    }
}
