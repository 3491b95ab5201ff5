use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::ModelError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Body of every failure response: `{ "error": { "kind", "message" } }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BackendUnavailable(_) => "BackendUnavailable",
            AppError::Timeout(_) => "Timeout",
            AppError::Model(_) => "ModelError",
            AppError::Internal(_) => "InternalError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::BackendUnavailable(_) | AppError::Timeout(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Model(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::InvalidInput(_) => AppError::InvalidInput(message),
            ModelError::BackendUnavailable(_) => AppError::BackendUnavailable(message),
            ModelError::Timeout(_) => AppError::Timeout(message),
            ModelError::Model(_) => AppError::Model(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::InvalidInput(msg)
            | AppError::BackendUnavailable(msg)
            | AppError::Timeout(msg)
            | AppError::Model(msg) => msg.clone(),
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                kind: self.kind(),
                message,
            },
        });

        (self.status(), body).into_response()
    }
}
