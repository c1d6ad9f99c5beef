use affiliation_extraction::{
    CacheStatus, DocumentClass, DocumentId, DocumentRef, ExtractionPayload, Resolution,
    VersionToken,
};
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ResolveParams {
    #[serde(default)]
    pub bypass_cache: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub message: ExtractionPayload,
    pub metadata: ResolveMetadata,
}

#[derive(Debug, Serialize)]
pub struct ResolveMetadata {
    pub plugin_name: String,
    pub id: DocumentId,
    pub class: DocumentClass,
    pub cache: CacheStatus,
    pub version: VersionToken,
}

impl From<Resolution> for ResolveResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            message: resolution.payload,
            metadata: ResolveMetadata {
                plugin_name: resolution.plugin_name,
                id: resolution.reference.id,
                class: resolution.reference.class,
                cache: resolution.cache,
                version: resolution.version,
            },
        }
    }
}

/// `GET /publisher/*id`: authors and affiliations from a publisher landing page.
pub async fn publisher_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    resolve(&state, DocumentRef::publisher(&id)?, params).await
}

/// `GET /repository/*id`: authors and affiliations from a repository page.
pub async fn repository_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    resolve(&state, DocumentRef::repository(&id)?, params).await
}

async fn resolve(
    state: &AppState,
    reference: DocumentRef,
    params: ResolveParams,
) -> Result<Json<ResolveResponse>, ApiError> {
    tracing::debug!(
        id = %reference.id,
        class = %reference.class,
        bypass_cache = params.bypass_cache,
        "Resolving document"
    );

    let resolution = state.cache.resolve(&reference, params.bypass_cache).await?;
    Ok(Json(resolution.into()))
}
