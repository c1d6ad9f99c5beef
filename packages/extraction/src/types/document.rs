//! Document identity, version tokens, and raw snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::error::{ExtractionError, Result};

/// Prefixes stripped from identifiers before they are used as keys.
const ID_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// A normalized document identifier (usually a DOI).
///
/// Normalization trims whitespace, percent-decodes, strips resolver
/// prefixes, and lowercases, so `DOI:10.1000%2FABC` and `10.1000/abc`
/// address the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Normalize a raw identifier. Fails when nothing is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let decoded = urlencoding::decode(trimmed).unwrap_or(Cow::Borrowed(trimmed));
        let mut id = decoded.trim().to_lowercase();

        for prefix in ID_PREFIXES {
            if let Some(rest) = id.strip_prefix(prefix) {
                id = rest.trim().to_string();
                break;
            }
        }

        if id.is_empty() {
            return Err(ExtractionError::InvalidId {
                raw: raw.to_string(),
            });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which family of page a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentClass {
    /// Publisher landing page for an article
    Publisher,
    /// Institutional or subject repository record page
    Repository,
}

impl DocumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Repository => "repository",
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document identifier together with its class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub class: DocumentClass,
}

impl DocumentRef {
    pub fn new(id: DocumentId, class: DocumentClass) -> Self {
        Self { id, class }
    }

    /// Reference a publisher landing page.
    pub fn publisher(raw_id: &str) -> Result<Self> {
        Ok(Self::new(DocumentId::parse(raw_id)?, DocumentClass::Publisher))
    }

    /// Reference a repository page.
    pub fn repository(raw_id: &str) -> Result<Self> {
        Ok(Self::new(DocumentId::parse(raw_id)?, DocumentClass::Repository))
    }

    /// Key under which results for this document are cached.
    ///
    /// The class is part of the key so a publisher and a repository
    /// resolution of the same identifier never overwrite each other.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.class, self.id)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.id)
    }
}

/// Opaque, totally ordered freshness marker of a snapshot.
///
/// Backed by the snapshot's last-modified instant. The core only orders
/// and compares tokens, except for the soft-TTL check which reads the
/// instant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(DateTime<Utc>);

impl VersionToken {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn as_instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for VersionToken {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

/// Raw page content as returned by a document source.
///
/// Produced fresh on every fetch and never cached; only the payload
/// derived from it is.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub reference: DocumentRef,

    /// Raw page bytes (HTML)
    pub content: Vec<u8>,

    /// Version of the snapshot these bytes came from
    pub version: VersionToken,

    /// Landing URL recorded by the snapshot store, when known
    pub url: Option<String>,
}

impl RawDocument {
    pub fn new(reference: DocumentRef, content: impl Into<Vec<u8>>, version: VersionToken) -> Self {
        Self {
            reference,
            content: content.into(),
            version,
            url: None,
        }
    }

    /// Set the landing URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
