//! Error types for listing search and lookup
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == MLS Error Enum ==
/// Unified error type for the listing core.
///
/// The first four variants come from the API client. Callers treat all of
/// them as "no data"; they differ only in what gets logged.
#[derive(Error, Debug)]
pub enum MlsError {
    /// DNS, connection or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-200 status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Body was not valid JSON or lacked the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON parsed but carried an embedded error object
    #[error("Provider error: {0}")]
    Provider(String),

    /// Single-listing lookup returned zero records
    #[error("Listing not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable identifier or cache key
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MlsError {
    /// True for failures that originate from the upstream provider call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            MlsError::Transport(_)
                | MlsError::Http(_)
                | MlsError::MalformedResponse(_)
                | MlsError::Provider(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for MlsError {
    fn into_response(self) -> Response {
        // Upstream details are logged by the client, never echoed to users
        let (status, message) = match &self {
            err if err.is_upstream() => (
                StatusCode::BAD_GATEWAY,
                "Unable to retrieve listings at this time".to_string(),
            ),
            MlsError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Property not found or no longer available".to_string(),
            ),
            MlsError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the listing core.
pub type Result<T> = std::result::Result<T, MlsError>;
