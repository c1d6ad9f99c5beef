//! DSpace item pages.

use crate::dom::ParsedDocument;
use crate::error::PluginResult;
use crate::plugins::citation_meta::{first_meta, highwire_authors};
use crate::traits::extractor::Extractor;
use crate::types::payload::{AuthorRecord, ExtractionPayload};

const CREATOR_NAMES: &[&str] = &["dc.creator", "dc.contributor.author", "dc.contributor"];
const ABSTRACT_NAMES: &[&str] = &["dcterms.abstract", "dc.description.abstract", "dc.description"];
const DATE_NAMES: &[&str] = &["dcterms.issued", "dc.date.issued", "citation_publication_date"];

pub struct DSpace;

impl DSpace {
    fn dublin_core_authors(doc: &ParsedDocument) -> Vec<AuthorRecord> {
        CREATOR_NAMES
            .iter()
            .map(|name| doc.meta_contents(name))
            .find(|names| !names.is_empty())
            .unwrap_or_default()
            .into_iter()
            .map(AuthorRecord::new)
            .collect()
    }
}

impl Extractor for DSpace {
    fn name(&self) -> &str {
        "dspace"
    }

    fn is_publisher_specific(&self) -> bool {
        true
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        let generator = doc.meta_content("generator").unwrap_or_default().to_lowercase();
        if generator.contains("dspace") {
            return Ok(true);
        }
        let handle_url = doc.url().map(|u| u.contains("/handle/")).unwrap_or(false);
        Ok(handle_url && !Self::dublin_core_authors(doc).is_empty())
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        !highwire_authors(doc).is_empty() || !Self::dublin_core_authors(doc).is_empty()
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        // Newer DSpace releases also emit Highwire tags, which carry institutions.
        let highwire = highwire_authors(doc);
        let authors = if highwire.is_empty() {
            Self::dublin_core_authors(doc)
        } else {
            highwire
        };

        let mut payload = ExtractionPayload::new(authors);
        payload.abstract_text = first_meta(doc, ABSTRACT_NAMES);
        payload.extras.published_date = first_meta(doc, DATE_NAMES);
        payload.extras.genre = doc.meta_content("dc.type").map(|t| t.to_lowercase());

        Ok(payload)
    }
}
