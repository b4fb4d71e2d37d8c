//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::RepositoryError;
use crate::pipeline::ActionError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Errors that escape an action's filters, plus request-level failures
/// raised before a pipeline runs.
///
/// The routed pipelines all carry `HandleExceptionFilter`, so `Service` and
/// `Binding` only surface from pipelines assembled without it.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (malformed body or upload)
    BadRequest(String),
    /// Service layer failure
    Service(ServiceError),
    /// Argument that could not be bound to the action's type
    Binding(String),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Binding(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BINDING_ERROR", msg)),
            AppError::Service(err) => match err {
                ServiceError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("VALIDATION_ERROR", "Validation failed")
                        .with_details(errors.to_string()),
                ),
                ServiceError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
                ServiceError::InvalidArgument(msg) => {
                    (StatusCode::BAD_REQUEST, ApiError::new("INVALID_ARGUMENT", msg))
                }
                ServiceError::Repository(e) if e.is_not_found() => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string()))
                }
                ServiceError::Repository(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("REPOSITORY_ERROR", e.to_string()),
                ),
                ServiceError::Export(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("EXPORT_ERROR", msg),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Service(ServiceError::Repository(err))
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Service(err) => AppError::Service(err),
            ActionError::Binding(msg) => AppError::Binding(msg),
        }
    }
}
