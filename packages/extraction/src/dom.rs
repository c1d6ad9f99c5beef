//! Parsed snapshot handed to extractor plugins.
//!
//! Wraps a `scraper::Html` tree with the lookups nearly every plugin needs
//! (meta tags, landing URL, host). The tree is not `Send`, so a
//! `ParsedDocument` lives only inside a synchronous dispatch call.

use scraper::{ElementRef, Html, Selector};

use crate::types::document::{DocumentRef, RawDocument};

/// A parsed landing or repository page.
pub struct ParsedDocument {
    reference: DocumentRef,
    html: Html,
    url: Option<String>,
}

impl ParsedDocument {
    /// Parse a raw snapshot.
    pub fn parse(raw: &RawDocument) -> Self {
        let html = Html::parse_document(&raw.text());
        let mut doc = Self {
            reference: raw.reference.clone(),
            html,
            url: None,
        };
        doc.url = raw.url.clone().or_else(|| doc.discover_url());
        doc
    }

    /// Parse an HTML string directly (used by plugin tests).
    pub fn from_html(reference: DocumentRef, html: &str) -> Self {
        let mut doc = Self {
            reference,
            html: Html::parse_document(html),
            url: None,
        };
        doc.url = doc.discover_url();
        doc
    }

    pub fn reference(&self) -> &DocumentRef {
        &self.reference
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Landing URL: the one recorded with the snapshot, else the page's
    /// canonical link, `og:url`, or `citation_abstract_html_url`.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Lowercased host of the landing URL, without a leading `www.`.
    pub fn host(&self) -> Option<String> {
        let parsed = url::Url::parse(self.url()?).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
    }

    /// True if the landing host equals `domain` or is a subdomain of it.
    pub fn host_matches(&self, domain: &str) -> bool {
        match self.host() {
            Some(host) => host == domain || host.ends_with(&format!(".{domain}")),
            None => false,
        }
    }

    /// All elements matching a CSS selector. An invalid selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// First element matching a CSS selector.
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html.select(&selector).next()
    }

    /// True if anything matches the selector.
    pub fn exists(&self, css: &str) -> bool {
        self.select_first(css).is_some()
    }

    /// `content` of every `<meta name=...>` with the given name (case-insensitive), in page order.
    pub fn meta_contents(&self, name: &str) -> Vec<String> {
        let wanted = name.to_lowercase();
        self.select("meta[name], meta[property]")
            .into_iter()
            .filter(|el| {
                let value = el.value();
                value
                    .attr("name")
                    .or_else(|| value.attr("property"))
                    .map(|n| n.to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .filter_map(|el| el.value().attr("content").map(str::to_string))
            .collect()
    }

    /// First non-empty `content` of a named meta tag.
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.meta_contents(name)
            .into_iter()
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
    }

    /// Trimmed `<title>` text.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(|el| text_of(&el))
            .filter(|t| !t.is_empty())
    }

    /// Whole-page visible text, lowercased. Used by cheap substring checks.
    pub fn body_text_lower(&self) -> String {
        self.select_first("body")
            .map(|el| text_of(&el).to_lowercase())
            .unwrap_or_default()
    }

    fn discover_url(&self) -> Option<String> {
        self.select_first("link[rel='canonical']")
            .and_then(|el| el.value().attr("href").map(str::to_string))
            .or_else(|| self.meta_content("og:url"))
            .or_else(|| self.meta_content("citation_abstract_html_url"))
            .filter(|u| u.starts_with("http"))
    }
}

/// Descendants of `el` matching a CSS selector.
pub fn select_within<'a>(el: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => el.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text content of an element with whitespace collapsed.
pub fn text_of(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> ParsedDocument {
        ParsedDocument::from_html(DocumentRef::publisher("10.1/test").unwrap(), html)
    }

    #[test]
    fn test_canonical_link_provides_host() {
        let d = doc(r#"<html><head><link rel="canonical" href="https://www.mdpi.com/1/2/3"></head></html>"#);
        assert_eq!(d.url(), Some("https://www.mdpi.com/1/2/3"));
        assert_eq!(d.host().as_deref(), Some("mdpi.com"));
        assert!(d.host_matches("mdpi.com"));
        assert!(!d.host_matches("pdi.com"));
    }

    #[test]
    fn test_snapshot_url_wins_over_canonical() {
        let reference = DocumentRef::publisher("10.1/test").unwrap();
        let raw = RawDocument::new(
            reference,
            r#"<link rel="canonical" href="https://other.org/x">"#,
            crate::types::document::VersionToken::new(chrono::Utc::now()),
        )
        .with_url("https://link.springer.com/article/10.1/test");
        let d = ParsedDocument::parse(&raw);
        assert!(d.host_matches("springer.com"));
    }

    #[test]
    fn test_meta_contents_in_page_order() {
        let d = doc(
            r#"<html><head>
            <meta name="citation_author" content="Ada Lovelace">
            <meta name="Citation_Author" content="Charles Babbage">
            <meta property="og:title" content="Engines">
            </head></html>"#,
        );
        assert_eq!(
            d.meta_contents("citation_author"),
            vec!["Ada Lovelace".to_string(), "Charles Babbage".to_string()]
        );
        assert_eq!(d.meta_content("og:title").as_deref(), Some("Engines"));
        assert!(d.meta_content("citation_doi").is_none());
    }

    #[test]
    fn test_text_of_collapses_whitespace() {
        let d = doc("<html><head><title>  A \n  Title </title></head></html>");
        assert_eq!(d.title().as_deref(), Some("A Title"));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let d = doc("<p>x</p>");
        assert!(d.select("p[").is_empty());
    }
}
