//! Unified error handling for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use brisa_core::ValidationError;

use crate::ai::AiError;
use crate::db::RepositoryError;
use crate::services::email::EmailError;
use crate::services::report::ReportError;

/// Application-level error type for the back office.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Customer input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Email delivery failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Agenda summary request failed.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// PDF rendering failed.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Feature is not configured on this deployment.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream and internal faults are logged here, once, with detail;
        // clients only ever see the generic message below.
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Email(_) | Self::Ai(_) | Self::Report(_)
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            // A missing row surfaces as 404 whether the handler noticed or
            // the repository did.
            Self::NotFound(_) | Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) | Self::Report(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Email(_) | Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(_) | Self::Internal(_) | Self::Report(_) => {
                "Internal server error".to_string()
            }
            Self::Email(_) | Self::Ai(_) => "Upstream service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
