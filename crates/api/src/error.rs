//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use sobriety::BreathError;
use trust_score::ScoringError;

/// Errors returned by route handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Breath(#[from] BreathError),

    #[error("Metrics exporter not installed")]
    MetricsDisabled,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Scoring(_) | ApiError::Breath(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MetricsDisabled => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
