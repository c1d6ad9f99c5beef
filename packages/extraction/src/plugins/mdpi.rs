//! MDPI landing pages.
//!
//! Authors carry superscript ids (`1,2,*`) that point into a numbered
//! affiliation list further down the page. `*` marks the corresponding
//! author.

use crate::dom::{select_within, text_of, ParsedDocument};
use crate::error::PluginResult;
use crate::normalize::affiliations::{resolve_affiliations, AffId, AffiliationRecord, AuthorRef};
use crate::plugins::citation_meta::{first_meta, highwire_genre};
use crate::traits::extractor::Extractor;
use crate::types::payload::ExtractionPayload;

const AUTHOR_SELECTOR: &str = "div.art-authors span.inlineblock";
const AFFILIATION_SELECTOR: &str = "div.art-affiliations div.affiliation";

pub struct Mdpi;

impl Mdpi {
    fn authors(doc: &ParsedDocument) -> Vec<AuthorRef> {
        doc.select(AUTHOR_SELECTOR)
            .iter()
            .filter_map(|span| {
                let name = select_within(span, ".profile-card-drop")
                    .first()
                    .map(text_of)
                    .filter(|n| !n.is_empty())?;
                let marks = select_within(span, "sup")
                    .first()
                    .map(text_of)
                    .unwrap_or_default();

                let mut ids = Vec::new();
                let mut corresponding = false;
                for mark in marks.split(',').map(str::trim).filter(|m| !m.is_empty()) {
                    match mark {
                        "*" => corresponding = true,
                        // Equal-contribution and deceased markers carry no affiliation.
                        "†" | "‡" | "§" => {}
                        id => ids.push(AffId::from(id)),
                    }
                }

                Some(
                    AuthorRef::new(name)
                        .with_ids(ids)
                        .with_corresponding(corresponding.then_some(true)),
                )
            })
            .collect()
    }

    fn affiliations(doc: &ParsedDocument) -> Vec<AffiliationRecord> {
        doc.select(AFFILIATION_SELECTOR)
            .iter()
            .filter_map(|row| {
                let organization = select_within(row, ".affiliation-name")
                    .first()
                    .map(text_of)
                    .filter(|o| !o.is_empty())?;
                let id = select_within(row, ".affiliation-item sup")
                    .first()
                    .map(text_of)
                    .filter(|id| !id.is_empty());

                Some(match id {
                    Some(id) => AffiliationRecord::with_id(organization, id),
                    None => AffiliationRecord::unreferenced(organization),
                })
            })
            .collect()
    }
}

impl Extractor for Mdpi {
    fn name(&self) -> &str {
        "mdpi"
    }

    fn is_publisher_specific(&self) -> bool {
        true
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        if doc.host_matches("mdpi.com") {
            return Ok(true);
        }
        Ok(doc
            .meta_content("citation_publisher")
            .map(|p| {
                let p = p.to_lowercase();
                p == "mdpi" || p.contains("multidisciplinary digital publishing")
            })
            .unwrap_or(false))
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        doc.exists(AUTHOR_SELECTOR)
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        let authors = resolve_affiliations(Self::authors(doc), &Self::affiliations(doc));

        let mut payload = ExtractionPayload::new(authors);
        payload.abstract_text = doc
            .select_first("div.art-abstract")
            .map(|el| text_of(&el))
            .or_else(|| doc.meta_content("citation_abstract"));
        payload.extras.published_date = first_meta(doc, &["citation_publication_date", "citation_date"]);
        payload.extras.genre = Some(highwire_genre(doc).unwrap_or("journal-article").to_string());

        Ok(payload)
    }
}
