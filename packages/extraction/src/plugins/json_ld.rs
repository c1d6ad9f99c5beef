//! schema.org article metadata embedded as JSON-LD.

use serde_json::Value;

use crate::dom::ParsedDocument;
use crate::error::{PluginError, PluginResult};
use crate::traits::extractor::Extractor;
use crate::types::payload::{AuthorRecord, ExtractionPayload};

const ARTICLE_TYPES: &[(&str, &str)] = &[
    ("ScholarlyArticle", "journal-article"),
    ("MedicalScholarlyArticle", "journal-article"),
    ("Article", "journal-article"),
    ("Chapter", "book-chapter"),
    ("Thesis", "dissertation"),
    ("Report", "report"),
];

pub struct JsonLd;

impl JsonLd {
    fn blocks(doc: &ParsedDocument) -> Vec<Value> {
        doc.select("script[type='application/ld+json']")
            .iter()
            .filter_map(|el| serde_json::from_str(&el.inner_html()).ok())
            .collect()
    }

    /// First article node across all JSON-LD blocks, with its genre.
    fn find_article(doc: &ParsedDocument) -> Option<(Value, &'static str)> {
        Self::blocks(doc).into_iter().find_map(|block| {
            find_article_in(&block).map(|(article, genre)| (article.clone(), genre))
        })
    }
}

fn article_genre(node: &serde_json::Map<String, Value>) -> Option<&'static str> {
    let types: Vec<&str> = match node.get("@type")? {
        Value::String(s) => vec![s.as_str()],
        Value::Array(arr) => arr.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };
    ARTICLE_TYPES
        .iter()
        .find(|(schema, _)| types.contains(schema))
        .map(|(_, genre)| *genre)
}

fn find_article_in(json: &Value) -> Option<(&Value, &'static str)> {
    match json {
        Value::Object(obj) => {
            if let Some(genre) = article_genre(obj) {
                return Some((json, genre));
            }
            if let Some(found) = obj.get("@graph").and_then(find_article_in) {
                return Some(found);
            }
            obj.values().find_map(find_article_in)
        }
        Value::Array(arr) => arr.iter().find_map(find_article_in),
        _ => None,
    }
}

/// One value or an array of them, as a list.
fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

fn person_name(person: &Value) -> Option<String> {
    match person {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                let given = obj.get("givenName").and_then(Value::as_str)?;
                let family = obj.get("familyName").and_then(Value::as_str).unwrap_or("");
                Some(format!("{given} {family}"))
            }),
        _ => None,
    }
}

fn organization_name(org: &Value) -> Option<String> {
    match org {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn author_record(person: &Value) -> Option<AuthorRecord> {
    let name = person_name(person)?;
    let affiliations = as_list(person.get("affiliation"))
        .into_iter()
        .filter_map(organization_name);
    Some(AuthorRecord::new(name).with_affiliations(affiliations))
}

impl Extractor for JsonLd {
    fn name(&self) -> &str {
        "json_ld"
    }

    fn is_publisher_specific(&self) -> bool {
        false
    }

    fn detects(&self, doc: &ParsedDocument) -> PluginResult<bool> {
        Ok(doc.exists("script[type='application/ld+json']"))
    }

    fn has_extractable_content(&self, doc: &ParsedDocument) -> bool {
        Self::find_article(doc)
            .map(|(article, _)| !as_list(article.get("author")).is_empty())
            .unwrap_or(false)
    }

    fn extract(&self, doc: &ParsedDocument) -> PluginResult<ExtractionPayload> {
        let (article, genre) = Self::find_article(doc)
            .ok_or_else(|| PluginError::failed("no schema.org article in JSON-LD"))?;

        let authors = as_list(article.get("author"))
            .into_iter()
            .filter_map(author_record)
            .collect();

        let mut payload = ExtractionPayload::new(authors).with_genre(genre);
        payload.abstract_text = article
            .get("abstract")
            .or_else(|| article.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        payload.extras.published_date = article
            .get("datePublished")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(payload)
    }
}
