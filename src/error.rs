//! Unified error types for the relay service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for the relay service.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Inbound snapshot could not be normalized.
    #[error("ingest failed: {0}")]
    Ingest(#[from] NormalizeError),

    /// Request body was not acceptable JSON.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Stored snapshot could not be shaped into a response.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Errors produced while coercing an inbound payload into a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload was not a JSON object.
    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// `timestamp` was neither null nor a number.
    #[error("timestamp must be a number or null, got {0}")]
    InvalidTimestamp(&'static str),

    /// `timestamp` was a number outside the representable range.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(String),

    /// `players` was neither null nor an array.
    #[error("players must be an array or null, got {0}")]
    InvalidPlayers(&'static str),
}

/// Failure body returned by every endpoint: `{success:false, error}`.
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    /// Always `false`.
    pub success: bool,
    /// Human readable failure summary.
    pub error: &'static str,
}

impl RelayError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Ingest(_) | RelayError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed caller-facing message. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::Ingest(_) | RelayError::InvalidBody(_) => "Failed to process player data",
            RelayError::Fetch(_) => "Failed to retrieve player data",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = FailureResponse {
            success: false,
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, RelayError>;
