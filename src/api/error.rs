use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::InvocationError;

/// Errors the predict endpoint reports to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prediction timed out")]
    PredictionTimedOut,

    #[error("Prediction failed")]
    PredictionFailed { details: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl From<InvocationError> for ApiError {
    fn from(err: InvocationError) -> Self {
        match err {
            InvocationError::TimeoutExceeded { .. } => ApiError::PredictionTimedOut,
            InvocationError::NonZeroExit { stderr, .. } => ApiError::PredictionFailed { details: stderr },
            InvocationError::LaunchError { reason } => ApiError::PredictionFailed { details: reason },
            InvocationError::MalformedOutput { reason } => ApiError::Internal { message: reason },
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::PredictionTimedOut => StatusCode::REQUEST_TIMEOUT,
            ApiError::PredictionFailed { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::PredictionTimedOut => json!({
                "error": "Prediction timed out",
                "message": "The prediction took too long to complete",
            }),
            ApiError::PredictionFailed { details } => json!({
                "error": "Prediction failed",
                "details": details,
            }),
            ApiError::Internal { message } => json!({
                "error": "Internal server error",
                "message": message,
            }),
        };
        (status, Json(body)).into_response()
    }
}
