//! Result normalization.
//!
//! Every plugin payload passes through [`normalize_payload`] before the
//! selection engine judges it, so acceptance and caching always see the
//! canonical shape.

pub mod affiliations;

pub use affiliations::{resolve_affiliations, AffId, AffiliationRecord, AuthorRef};

use crate::types::payload::{AuthorRecord, ExtractionPayload};

/// Canonicalize a plugin payload.
///
/// - whitespace collapsed in names, affiliations, abstract, and extras
/// - authors with empty names dropped
/// - empty and repeated affiliations dropped, first occurrence kept
/// - empty optional strings become `None`
/// - corresponding-author flags normalized (see [`normalize_corresponding`])
pub fn normalize_payload(payload: ExtractionPayload) -> ExtractionPayload {
    let mut authors: Vec<AuthorRecord> = payload
        .authors
        .into_iter()
        .filter_map(|author| {
            let name = clean(&author.name)?;
            let mut affiliations: Vec<String> = Vec::with_capacity(author.affiliations.len());
            for aff in author.affiliations.iter().filter_map(|a| clean(a)) {
                if !affiliations.contains(&aff) {
                    affiliations.push(aff);
                }
            }
            Some(AuthorRecord {
                name,
                affiliations,
                is_corresponding: author.is_corresponding,
            })
        })
        .collect();

    normalize_corresponding(&mut authors);

    let mut extras = payload.extras;
    extras.published_date = extras.published_date.as_deref().and_then(clean);
    extras.genre = extras.genre.as_deref().and_then(clean);

    ExtractionPayload {
        authors,
        abstract_text: payload.abstract_text.as_deref().and_then(clean),
        extras,
    }
}

/// Apply the corresponding-author rule across one document's authors.
///
/// If nobody is marked corresponding, everybody becomes unknown. If
/// somebody is, everybody else becomes `false`.
pub fn normalize_corresponding(authors: &mut [AuthorRecord]) {
    let any_confirmed = authors.iter().any(|a| a.is_corresponding == Some(true));

    for author in authors.iter_mut() {
        author.is_corresponding = match (any_confirmed, author.is_corresponding) {
            (true, Some(true)) => Some(true),
            (true, _) => Some(false),
            (false, _) => None,
        };
    }
}

/// Collapse whitespace; `None` when nothing is left.
fn clean(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
