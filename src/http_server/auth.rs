//! API Key Check
//!
//! Writes must carry `x-api-key` equal to the configured shared secret.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::warn;

use super::errors::ApiError;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check for write endpoints
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuth {
    key: Option<String>,
}

impl ApiKeyAuth {
    /// Create a check for `key`. With no key configured every request fails.
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }

    /// True when a secret is configured
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Validate the request headers
    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let provided = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        let authorized = match (self.key.as_deref(), provided) {
            (Some(expected), Some(given)) => constant_time_str_eq(expected, given),
            _ => false,
        };

        if authorized {
            Ok(())
        } else {
            warn!(key_present = provided.is_some(), "rejected write with bad API key");
            Err(ApiError::Unauthorized("invalid API key".into()))
        }
    }
}

/// Constant-time comparison of two strings
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
