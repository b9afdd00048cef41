//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that classifies every failure before it
//! reaches the client. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use client_registry_core::FieldErrors;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::PostalLookupError;

/// Application-level error type for the registry API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payload failed the field contract.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// No client matches the requested id.
    #[error("Client {0} not found")]
    NotFound(String),

    /// The postal code lookup service rejected the code or failed.
    #[error("Postal code lookup failed for {postal_code}: {source}")]
    PostalLookup {
        postal_code: String,
        #[source]
        source: PostalLookupError,
    },

    /// Storage operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::PostalLookup { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if let Self::PostalLookup { .. } = &self {
            tracing::warn!(error = %self, "Postal code lookup failed");
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            Self::NotFound(id) => json!({
                "message": format!("Client {id} not found"),
            }),
            Self::PostalLookup {
                postal_code,
                source,
            } => json!({
                "message": "Invalid postal code",
                "postalCode": postal_code,
                "error": source.to_string(),
            }),
            Self::Repository(_) | Self::Internal(_) => json!({
                "message": "Internal server error",
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use client_registry_core::PostalCodeError;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("7".to_string());
        assert_eq!(err.to_string(), "Client 7 not found");

        let err = AppError::Internal("disk full".to_string());
        assert_eq!(err.to_string(), "Internal error: disk full");
    }

    #[tokio::test]
    async fn test_validation_body() {
        let mut errors = FieldErrors::new();
        errors.push("name", "must be at least 3 characters long");

        let (status, body) = body_json(AppError::from(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Validation failed",
                "errors": { "name": ["must be at least 3 characters long"] }
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(AppError::NotFound("12".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Client 12 not found" }));
    }

    #[tokio::test]
    async fn test_postal_lookup_body() {
        let (status, body) = body_json(AppError::PostalLookup {
            postal_code: "99999999".to_string(),
            source: PostalLookupError::NotFound("99999999".to_string()),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Invalid postal code",
                "postalCode": "99999999",
                "error": "postal code 99999999 not found"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let repo_err = RepositoryError::DataCorruption("secret path".to_string());
        let (status, body) = body_json(AppError::from(repo_err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal server error" }));

        let (status, body) = body_json(AppError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("boom"));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PostalLookup {
                postal_code: "1".to_string(),
                source: PostalLookupError::InvalidPostalCode(PostalCodeError::NonDigit),
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
