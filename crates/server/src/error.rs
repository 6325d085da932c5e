//! Boundary error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Rule violations keep their messages; internal
//! failures are reported opaquely.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use coverbook_core::{ErrorBody, ValidationErrors};

use crate::service::ServiceError;

/// Application-level error type for the registry service.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Duplicate identification number or email.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::InvalidArgument(message) => Self::BadRequest(message),
            ServiceError::Conflict(message) => Self::Conflict(message),
            ServiceError::NotFound(id) => {
                Self::NotFound(format!("no insured found with identification {id}"))
            }
            ServiceError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => ErrorBody::field_errors(errors),
            Self::BadRequest(message) | Self::Conflict(message) | Self::NotFound(message) => {
                ErrorBody::message(message)
            }
            Self::Internal(_) => ErrorBody::message("internal server error"),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
