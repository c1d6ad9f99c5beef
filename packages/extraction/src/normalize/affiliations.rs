//! Affiliation resolution: mapping author cross-reference ids to
//! affiliation strings.
//!
//! Pages usually print affiliations once, numbered or lettered, and mark
//! each author with the ids that apply. Plugins collect both sides and
//! call [`resolve_affiliations`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::payload::AuthorRecord;

/// Cross-reference id as printed on the page.
///
/// Matching is exact: `Text("1")` does not match `Number(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AffId {
    Number(i64),
    Text(String),
}

impl From<&str> for AffId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AffId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AffId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for AffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An affiliation as printed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationRecord {
    pub organization: String,
    pub aff_id: Option<AffId>,
}

impl AffiliationRecord {
    pub fn new(organization: impl Into<String>, aff_id: Option<AffId>) -> Self {
        Self {
            organization: organization.into(),
            aff_id,
        }
    }

    /// Affiliation with an id authors can reference.
    pub fn with_id(organization: impl Into<String>, aff_id: impl Into<AffId>) -> Self {
        Self::new(organization, Some(aff_id.into()))
    }

    /// Affiliation printed without an id.
    pub fn unreferenced(organization: impl Into<String>) -> Self {
        Self::new(organization, None)
    }
}

/// An author with the affiliation ids printed next to their name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
    pub name: String,
    pub aff_ids: Vec<AffId>,
    pub is_corresponding: Option<bool>,
}

impl AuthorRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aff_ids: Vec::new(),
            is_corresponding: None,
        }
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = impl Into<AffId>>) -> Self {
        self.aff_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_corresponding(mut self, is_corresponding: Option<bool>) -> Self {
        self.is_corresponding = is_corresponding;
        self
    }
}

/// Resolve every author's affiliations.
///
/// - An author gets the organization of every affiliation whose id is one
///   of theirs, in affiliation order.
/// - An author with no ids gets the single id-less affiliation, if exactly
///   one id-less affiliation exists.
/// - Anyone else gets an empty list.
pub fn resolve_affiliations(
    authors: Vec<AuthorRef>,
    affiliations: &[AffiliationRecord],
) -> Vec<AuthorRecord> {
    let mut unreferenced = affiliations.iter().filter(|a| a.aff_id.is_none());
    let sole_unreferenced = match (unreferenced.next(), unreferenced.next()) {
        (Some(only), None) => Some(only.organization.clone()),
        _ => None,
    };

    authors
        .into_iter()
        .map(|author| {
            let resolved: Vec<String> = if author.aff_ids.is_empty() {
                sole_unreferenced.iter().cloned().collect()
            } else {
                affiliations
                    .iter()
                    .filter(|aff| {
                        aff.aff_id
                            .as_ref()
                            .map(|id| author.aff_ids.contains(id))
                            .unwrap_or(false)
                    })
                    .map(|aff| aff.organization.clone())
                    .collect()
            };

            AuthorRecord {
                name: author.name,
                affiliations: resolved,
                is_corresponding: author.is_corresponding,
            }
        })
        .collect()
}
