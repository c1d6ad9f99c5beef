//! Highwire Press `citation_*` meta tags.
//!
//! Nearly every publisher and many repositories emit these, so the same
//! logic serves as the publisher fallback and as a generic repository
//! plugin.

use crate::dom::ParsedDocument;
use crate::error::PluginResult;
use crate::traits::extractor::Extractor;
use crate::types::payload::{AuthorRecord, ExtractionPayload};

const AUTHOR: &str = "citation_author";
const AFFILIATION_NAMES: &[&str] = &["citation_author_institution", "citation_author_affiliation"];
const DATE_NAMES: &[&str] = &["citation_publication_date", "citation_date", "citation_online_date"];
const ABSTRACT_NAMES: &[&str] = &["citation_abstract", "dc.description", "description"];

pub struct CitationMeta {
    name: &'static str,
}

impl CitationMeta {
    /// Fallback for publisher pages.
    pub fn publisher() -> Self {
        Self { name: "citation_meta" }
    }

    /// Generic plugin for repository pages.
    pub fn repository() -> Self {
        Self {
            name: "citation_repository",
        }
    }
}

/// Authors in page order, each with the institution tags that follow it.
pub(crate) fn highwire_authors(doc: &ParsedDocument) -> Vec<AuthorRecord> {
    let mut authors: Vec<AuthorRecord> = Vec::new();

    for el in doc.select("meta[name]") {
        let value = el.value();
        let (Some(name), Some(content)) = (value.attr("name"), value.attr("content")) else {
            continue;
        };
        let name = name.to_lowercase();

        if name == AUTHOR {
            authors.push(AuthorRecord::new(content));
        } else if AFFILIATION_NAMES.contains(&name.as_str()) {
            // Institution tags before the first author belong to nobody.
            if let Some(current) = authors.last_mut() {
                current.affiliations.push(content.to_string());
            }
        }
    }

    authors
}

pub(crate) fn first_meta(doc: &ParsedDocument, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| doc.meta_content(name))
}

pub(crate) fn highwire_genre(doc: &ParsedDocument) -> Option<&'static str> {
    if doc.meta_content("citation_journal_title").is_some() {
        Some("journal-article")
    } else if doc.meta_content("citation_conference_title").is_some() {
        Some("proceedings-article")
    } else if doc.meta_content("citation_inbook_title").is_some() {
        Some("book-chapter")
    } else if doc.meta_content("citation_dissertation_institution").is_some() {
        Some("dissertation")
    } else if doc.meta_content("citation_technical_report_institution").is_some() {
        Some("report")
    } else {
        None
    }
}

/// Full payload from Highwire tags alone.
pub(crate) fn highwire_payload(doc: &ParsedDocument) -> ExtractionPayload {
    let mut payload = ExtractionPayload::new(highwire_authors(doc));
    payload.abstract_text = first_meta(doc, ABSTRACT_NAMES);
    payload.extras.published_date = first_meta(doc, DATE_NAMES);
    payload.extras.genre = highwire_genre(doc).map(str::to_string);
    payload
}

impl Extractor for CitationMeta {
    fn name(&self) -> &str {
        self.name
    }

    fn is_publisher_specific(&self) -> bool {
        false
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        Ok(self.has_extractable_content(doc))
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        doc.meta_content(AUTHOR).is_some()
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        Ok(highwire_payload(doc))
    }
}
