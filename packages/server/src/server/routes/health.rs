use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    publisher_plugins: Vec<String>,
    repository_plugins: Vec<String>,
    soft_ttl_hours: i64,
}

/// Health check endpoint
///
/// Reports the registered plugins in dispatch order. The service has no
/// required backing connection at request time, so this is always 200.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let engine = state.cache.engine();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            publisher_plugins: owned(engine.publisher_registry().names()),
            repository_plugins: owned(engine.repository_registry().names()),
            soft_ttl_hours: state.cache.config().soft_ttl.num_hours(),
        }),
    )
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}
