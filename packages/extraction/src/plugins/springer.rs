//! Springer Nature landing pages (link.springer.com, nature.com).

use crate::dom::{text_of, ParsedDocument};
use crate::error::PluginResult;
use crate::plugins::citation_meta::{first_meta, highwire_authors, highwire_payload};
use crate::traits::extractor::Extractor;
use crate::types::payload::ExtractionPayload;

const ABSTRACT_SELECTORS: &[&str] = &[
    "#Abs1-content p",
    "section[data-title='Abstract'] p",
    "div.c-article-section__content p",
];

pub struct Springer;

impl Springer {
    fn corresponding_names(doc: &ParsedDocument) -> Vec<String> {
        doc.select("#corresponding-author-list a")
            .iter()
            .map(text_of)
            .filter(|n| !n.is_empty())
            .collect()
    }

    fn page_abstract(doc: &ParsedDocument) -> Option<String> {
        ABSTRACT_SELECTORS.iter().find_map(|css| {
            let text = doc
                .select(css)
                .iter()
                .map(text_of)
                .collect::<Vec<_>>()
                .join(" ");
            (!text.trim().is_empty()).then_some(text)
        })
    }
}

impl Extractor for Springer {
    fn name(&self) -> &str {
        "springer"
    }

    fn is_publisher_specific(&self) -> bool {
        true
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        if doc.host_matches("springer.com") || doc.host_matches("nature.com") {
            return Ok(true);
        }
        Ok(first_meta(doc, &["citation_publisher", "dc.publisher"])
            .map(|p| p.to_lowercase().contains("springer"))
            .unwrap_or(false))
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        !highwire_authors(doc).is_empty()
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        let mut payload = highwire_payload(doc);

        let corresponding = Self::corresponding_names(doc);
        if !corresponding.is_empty() {
            for author in &mut payload.authors {
                let hit = corresponding
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(author.name.trim()));
                author.is_corresponding = Some(hit);
            }
        }

        if let Some(text) = Self::page_abstract(doc) {
            payload.abstract_text = Some(text);
        }
        if payload.extras.genre.is_none() {
            payload.extras.genre = Some("journal-article".to_string());
        }

        Ok(payload)
    }
}
