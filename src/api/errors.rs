use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::graph::{FormError, GraphError, IngestError};
use crate::ner::RecognizeError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Raw graph API response, verbatim, when it refused a submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            upstream: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Recognize(#[from] RecognizeError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            ApiError::Form(_) | ApiError::Ingest(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new(self.to_string()),
            ),
            ApiError::Recognize(err) => {
                error!(error = %err, "entity recognition failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(format!("Entity recognition failed: {err}")),
                )
            }
            ApiError::Graph(GraphError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse::new("Graph API timed out"),
            ),
            ApiError::Graph(err) => {
                error!(error = %err, "graph API call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: err.to_string(),
                        upstream: err.raw_body().map(str::to_string),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
