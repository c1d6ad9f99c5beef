//! Mapping of extraction failures onto HTTP responses.

use affiliation_extraction::ExtractionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub kind: &'static str,
    pub message: String,
}

/// An extraction error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ExtractionError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ExtractionError::NotFound { .. } | ExtractionError::ParserNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ExtractionError::BlockedContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ExtractionError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            ExtractionError::Source(_) => StatusCode::BAD_GATEWAY,
            ExtractionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, kind = self.0.kind(), "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    code: status.as_u16(),
                    kind: self.0.kind(),
                    message: self.0.to_string(),
                },
            }),
        )
            .into_response()
    }
}
