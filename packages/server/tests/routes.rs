//! Router tests: status mapping and response shape over an in-memory stack.

use std::sync::Arc;

use affiliation_extraction::{
    CacheConfig, DocumentRef, FreshnessCache, MemoryCacheStore, MemoryDocumentSource,
    RawDocument, SelectionEngine, VersionToken,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use server_core::server::build_app;
use tower::ServiceExt;

const SPRINGER_PAGE: &str = r#"<html><head>
    <meta name="citation_author" content="Rosalind Franklin">
    <meta name="citation_author_institution" content="King's College London">
    <meta name="citation_publication_date" content="1953/04/25">
    </head><body></body></html>"#;

const CHALLENGE_PAGE: &str =
    "<html><head><title>Attention Required! | Cloudflare</title></head><body></body></html>";

fn app() -> Router {
    let source = MemoryDocumentSource::new();
    source.insert(
        RawDocument::new(
            DocumentRef::publisher("10.1038/171737a0").unwrap(),
            SPRINGER_PAGE,
            VersionToken::new(Utc::now()),
        )
        .with_url("https://www.nature.com/articles/171737a0"),
    );
    source.put_snapshot(
        &DocumentRef::repository("oai:blocked:1").unwrap(),
        CHALLENGE_PAGE,
        Utc::now(),
    );
    source.put_snapshot(
        &DocumentRef::repository("oai:empty:1").unwrap(),
        "<html><body>nothing</body></html>",
        Utc::now(),
    );

    let cache = FreshnessCache::new(
        Arc::new(source),
        Arc::new(MemoryCacheStore::new()),
        Arc::new(SelectionEngine::with_default_plugins()),
        CacheConfig::default(),
    );
    build_app(Arc::new(cache), &[])
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn publisher_success_shape() {
    let (status, body) = get(app(), "/publisher/10.1038/171737a0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["authors"][0]["name"], "Rosalind Franklin");
    assert_eq!(
        body["message"]["authors"][0]["affiliations"][0],
        "King's College London"
    );
    assert_eq!(body["message"]["extras"]["published_date"], "1953/04/25");
    assert_eq!(body["metadata"]["plugin_name"], "springer");
    assert_eq!(body["metadata"]["id"], "10.1038/171737a0");
    assert_eq!(body["metadata"]["cache"], "computed");
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let app = app();

    get(app.clone(), "/publisher/10.1038/171737a0").await;
    let (status, body) = get(app, "/publisher/10.1038/171737a0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["cache"], "warm");
}

#[tokio::test]
async fn bypass_cache_query_flag() {
    let app = app();

    get(app.clone(), "/publisher/10.1038/171737a0").await;
    let (status, body) = get(app, "/publisher/10.1038/171737a0?bypass_cache=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["cache"], "bypassed");
}

#[tokio::test]
async fn unknown_document_is_404() {
    let (status, body) = get(app(), "/publisher/10.9999/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn unparseable_document_is_404_parser_not_found() {
    let (status, body) = get(app(), "/repository/oai:empty:1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "parser_not_found");
}

#[tokio::test]
async fn challenge_page_is_422() {
    let (status, body) = get(app(), "/repository/oai:blocked:1").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "blocked_content");
}

#[tokio::test]
async fn blank_identifier_is_400() {
    let (status, body) = get(app(), "/publisher/%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_id");
}

#[tokio::test]
async fn health_lists_plugins_in_order() {
    let (status, body) = get(app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["publisher_plugins"][1], "springer");
    assert_eq!(body["repository_plugins"][1], "dspace");
    assert_eq!(body["soft_ttl_hours"], 24);
}
