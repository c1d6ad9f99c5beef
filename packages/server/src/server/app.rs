//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use affiliation_extraction::{
    CacheConfig, CacheStore, DocumentSource, FreshnessCache, HttpDocumentSource, HttpSourceConfig,
    MemoryCacheStore, MemoryDocumentSource, PostgresCacheStore, SelectionEngine,
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{CacheBackend, Config, DocumentSourceKind};
use crate::server::routes::{health_handler, publisher_handler, repository_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FreshnessCache>,
}

/// Wire the snapshot source, cache store, and selection engine from config.
pub async fn build_cache(config: &Config) -> Result<Arc<FreshnessCache>> {
    let source: Arc<dyn DocumentSource> = match config.document_source {
        DocumentSourceKind::Http => {
            let base_url = config
                .snapshot_base_url
                .clone()
                .context("SNAPSHOT_BASE_URL must be set")?;
            let source_config = HttpSourceConfig::new(base_url)
                .with_timeout(Duration::from_secs(config.snapshot_timeout_secs));
            Arc::new(HttpDocumentSource::new(source_config).context("Failed to build snapshot client")?)
        }
        DocumentSourceKind::Memory => {
            tracing::warn!("Using in-memory document source, every lookup will be not found");
            Arc::new(MemoryDocumentSource::new())
        }
    };

    let store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
        CacheBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            tracing::info!("Connecting to cache database...");
            let store = PostgresCacheStore::new(url)
                .await
                .context("Failed to connect to cache database")?;
            tracing::info!("Cache database connected");
            Arc::new(store)
        }
    };

    let engine = SelectionEngine::with_default_plugins();
    tracing::info!(
        publisher = ?engine.publisher_registry().names(),
        repository = ?engine.repository_registry().names(),
        "Plugins registered"
    );

    let cache_config = CacheConfig::new().with_soft_ttl(chrono::Duration::hours(config.soft_ttl_hours));

    Ok(Arc::new(FreshnessCache::new(
        source,
        store,
        Arc::new(engine),
        cache_config,
    )))
}

/// Build the Axum application router
pub fn build_app(cache: Arc<FreshnessCache>, allowed_origins: &[String]) -> Router {
    let app_state = AppState { cache };

    // No configured origins means any origin (development)
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/publisher/*id", get(publisher_handler))
        .route("/repository/*id", get(repository_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
