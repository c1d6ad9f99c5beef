//! Extraction output: authors, affiliations, abstract.

use serde::{Deserialize, Serialize};

/// One author as reported by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,

    /// Affiliations in the order the plugin discovered them
    #[serde(default)]
    pub affiliations: Vec<String>,

    /// `None` means the plugin could not tell, which is not the same as `false`
    #[serde(default)]
    pub is_corresponding: Option<bool>,
}

impl AuthorRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliations: Vec::new(),
            is_corresponding: None,
        }
    }

    /// Append an affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    /// Replace the affiliation list.
    pub fn with_affiliations(
        mut self,
        affiliations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.affiliations = affiliations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_corresponding(mut self, is_corresponding: Option<bool>) -> Self {
        self.is_corresponding = is_corresponding;
        self
    }

    pub fn has_affiliations(&self) -> bool {
        !self.affiliations.is_empty()
    }
}

/// Optional bibliographic fields some plugins can fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// The unit of work product: what a plugin extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPayload {
    pub authors: Vec<AuthorRecord>,

    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,

    #[serde(default)]
    pub extras: Extras,
}

impl ExtractionPayload {
    pub fn new(authors: Vec<AuthorRecord>) -> Self {
        Self {
            authors,
            ..Default::default()
        }
    }

    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    pub fn with_published_date(mut self, date: impl Into<String>) -> Self {
        self.extras.published_date = Some(date.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.extras.genre = Some(genre.into());
        self
    }

    /// True when at least one author carries a non-empty affiliation list.
    ///
    /// This is the acceptance test the selection engine applies to
    /// publisher-page candidates.
    pub fn has_any_affiliation(&self) -> bool {
        self.authors.iter().any(AuthorRecord::has_affiliations)
    }
}
