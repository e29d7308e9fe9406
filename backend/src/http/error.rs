//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::ServiceError;
use crate::upstream::UpstreamError;

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

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// The upstream API failed or answered with an error
    Upstream(UpstreamError),
    /// Upstream data could not be shaped into series
    Unprocessable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Upstream(e) => {
                let details = match &e {
                    UpstreamError::Status { status, .. } => Some(format!("upstream status {}", status)),
                    _ => None,
                };
                let mut error = ApiError::new("UPSTREAM_ERROR", e.to_string());
                if let Some(details) = details {
                    error = error.with_details(details);
                }
                (StatusCode::BAD_GATEWAY, error)
            }
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("SERIES_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidQuery(msg) => AppError::BadRequest(msg),
            UpstreamError::Series(e) => AppError::Unprocessable(e.to_string()),
            other => AppError::Upstream(other),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Upstream(e) => e.into(),
            ServiceError::Series(e) => AppError::Unprocessable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_maps_to_bad_request() {
        let err: AppError = UpstreamError::InvalidQuery("reversed".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_status_maps_to_bad_gateway() {
        let err: AppError = ServiceError::Upstream(UpstreamError::Status {
            status: 500,
            code: None,
            message: "boom".to_string(),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_series_error_maps_to_unprocessable() {
        let err: AppError = ServiceError::Series(crate::series::SeriesError::DuplicateLabel {
            label: "May".to_string(),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
