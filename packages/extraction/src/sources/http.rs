//! Snapshot store reachable over HTTP.
//!
//! Layout: `GET {base}/{class}/{percent-encoded id}` returns the archived
//! HTML, `HEAD` on the same URL returns only headers. The snapshot's
//! `Last-Modified` header is its version token; an optional
//! `X-Landing-Url` header carries the original landing URL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, LAST_MODIFIED};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result, SourceError, SourceResult};
use crate::traits::source::DocumentSource;
use crate::types::config::HttpSourceConfig;
use crate::types::document::{DocumentRef, RawDocument, VersionToken};

/// Header carrying the landing URL the snapshot was taken from.
pub const LANDING_URL_HEADER: &str = "x-landing-url";

/// HTTP-backed [`DocumentSource`].
///
/// # Example
///
/// ```rust,ignore
/// use affiliation_extraction::{HttpDocumentSource, HttpSourceConfig};
///
/// let source = HttpDocumentSource::new(HttpSourceConfig::new("https://snapshots.internal"))?;
/// let doc = source.fetch(&DocumentRef::publisher("10.1038/nature12373")?).await?;
/// ```
pub struct HttpDocumentSource {
    client: reqwest::Client,
    config: HttpSourceConfig,
}

impl HttpDocumentSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ExtractionError::Source(Box::new(e)))?;

        Ok(Self { client, config })
    }

    /// URL of the snapshot for a document.
    pub fn snapshot_url(&self, reference: &DocumentRef) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url,
            reference.class,
            urlencoding::encode(reference.id.as_str())
        )
    }

    fn check_status(reference: &DocumentRef, status: StatusCode) -> SourceResult<()> {
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                id: reference.id.clone(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Unavailable(
                format!("snapshot store returned HTTP {}", status).into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, reference: &DocumentRef) -> SourceResult<RawDocument> {
        let url = self.snapshot_url(reference);
        debug!(url = %url, "Fetching snapshot");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Snapshot request failed");
            SourceError::Unavailable(Box::new(e))
        })?;
        Self::check_status(reference, response.status())?;

        let version = version_from_headers(response.headers())?;
        let landing_url = response
            .headers()
            .get(LANDING_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Unavailable(Box::new(e)))?;

        let mut doc = RawDocument::new(reference.clone(), body.to_vec(), version);
        if let Some(landing_url) = landing_url {
            doc = doc.with_url(landing_url);
        }
        Ok(doc)
    }

    async fn version_of(&self, reference: &DocumentRef) -> SourceResult<VersionToken> {
        let url = self.snapshot_url(reference);
        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(Box::new(e)))?;
        Self::check_status(reference, response.status())?;

        version_from_headers(response.headers())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Read the `Last-Modified` header as a version token.
pub fn version_from_headers(headers: &HeaderMap) -> SourceResult<VersionToken> {
    let raw = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| SourceError::Unavailable("snapshot has no Last-Modified header".into()))?;

    DateTime::parse_from_rfc2822(raw)
        .map(|dt| VersionToken::new(dt.with_timezone(&Utc)))
        .map_err(|e| SourceError::Unavailable(format!("invalid Last-Modified {:?}: {}", raw, e).into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_snapshot_url_encodes_id() {
        let source = HttpDocumentSource::new(HttpSourceConfig::new("https://snapshots.test/")).unwrap();
        let reference = DocumentRef::publisher("10.1000/ABC(1)").unwrap();
        assert_eq!(
            source.snapshot_url(&reference),
            "https://snapshots.test/publisher/10.1000%2Fabc%281%29"
        );
    }

    #[test]
    fn test_last_modified_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(LAST_MODIFIED, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

        let version = version_from_headers(&headers).unwrap();

        assert_eq!(
            version,
            VersionToken::new(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_or_bad_last_modified_is_unavailable() {
        let headers = HeaderMap::new();
        assert!(matches!(version_from_headers(&headers), Err(SourceError::Unavailable(_))));

        let mut bad = HeaderMap::new();
        bad.insert(LAST_MODIFIED, HeaderValue::from_static("yesterday"));
        assert!(matches!(version_from_headers(&bad), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_status_mapping() {
        let reference = DocumentRef::publisher("10.1/x").unwrap();
        assert!(matches!(
            HttpDocumentSource::check_status(&reference, StatusCode::NOT_FOUND),
            Err(SourceError::NotFound { .. })
        ));
        assert!(matches!(
            HttpDocumentSource::check_status(&reference, StatusCode::BAD_GATEWAY),
            Err(SourceError::Unavailable(_))
        ));
        assert!(HttpDocumentSource::check_status(&reference, StatusCode::OK).is_ok());
    }
}
