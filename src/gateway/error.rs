use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::evaluation::{EvaluationError, MissingInput, ValidationError};
use crate::scoring::ScoringError;

use super::STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("scoring failed: {0}")]
    ScoringFailed(#[from] ScoringError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<EvaluationError> for GatewayError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::Validation(e) => GatewayError::Validation(e),
            EvaluationError::Embedding(e) => GatewayError::EmbeddingFailed(e.to_string()),
            EvaluationError::Scoring(e) => GatewayError::ScoringFailed(e),
        }
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::EmbeddingFailed(_)
            | GatewayError::ScoringFailed(_)
            | GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value of the status header for this error.
    pub fn status_label(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Validation(_) => "invalid_input",
            GatewayError::EmbeddingFailed(_) => "embedding_error",
            GatewayError::ScoringFailed(_) => "scoring_error",
            GatewayError::InternalError(_) => "internal_error",
        }
    }

    pub fn missing_input(&self) -> Option<MissingInput> {
        match self {
            GatewayError::Validation(e) => Some(e.missing),
            _ => None,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub missing: Option<MissingInput>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Evaluation request failed");
        } else {
            tracing::debug!(error = %self, "Evaluation request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(self.status_label()));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            missing: self.missing_input(),
        });

        (status, headers, body).into_response()
    }
}
