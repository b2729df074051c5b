//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps clearance domain errors to HTTP status codes and JSON error bodies
//! with a machine-readable code and a human-readable message. Internal error
//! details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use portflow_clearance::ClearanceError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "INVALID_TRANSITION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown container id (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// A status-axis precondition was not met (409). The message carries the
    /// current-vs-requested detail so the caller can explain the failure.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Payment amount does not equal the assessed duty (422).
    #[error("amount mismatch: {0}")]
    AmountMismatch(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Conflict with current resource state, e.g. duplicate container id (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            Self::AmountMismatch(_) => (StatusCode::UNPROCESSABLE_ENTITY, "AMOUNT_MISMATCH"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClearanceError> for AppError {
    fn from(err: ClearanceError) -> Self {
        match &err {
            ClearanceError::NotFound(_) => Self::NotFound(err.to_string()),
            ClearanceError::InvalidTransition { .. } => Self::InvalidTransition(err.to_string()),
            ClearanceError::AmountMismatch { .. } => Self::AmountMismatch(err.to_string()),
            ClearanceError::AlreadyExists(_) => Self::Conflict(err.to_string()),
        }
    }
}
