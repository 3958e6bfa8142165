//! HTTP Error Responses
//!
//! Maps request failures to a status code and an `{ok:false, error}` body.
//! Internal details are logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::telemetry::TelemetryError;

/// Message returned for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Request-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed payload (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong API key (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<TelemetryError> for ApiError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::Validation(msg) => ApiError::Validation(msg),
            TelemetryError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(%detail, "request failed");
        }
        let body = ErrorResponse {
            ok: false,
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err = ApiError::Internal("Lock poisoned".into());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_from_telemetry_error() {
        let err: ApiError = TelemetryError::validation("bad shape").into();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "bad shape"));
    }
}
