//! Error types for the REST surface and the WebSocket connection loops.
//!
//! [`ApiError`] is the error type for REST handlers; each variant maps to an
//! HTTP status code and a structured JSON error response.
//! [`ConnectionError`] classifies why a WebSocket connection closed,
//! distinguishing protocol violations from transport failures so tests (and
//! log readers) can tell which occurred.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All REST error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request body: ...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side REST error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body could not be parsed as a JSON attribute map.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidBody(_) => 1001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// A malformed inbound WebSocket frame.
///
/// Protocol errors never mutate the world and never trigger a broadcast;
/// the offending connection is closed.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The frame was a JSON object but not a valid entity update
    /// (missing `entity`, missing `data`, or wrong field types).
    #[error("malformed entity update: {0}")]
    InvalidUpdate(serde_json::Error),

    /// The frame was valid JSON of a shape the protocol does not define
    /// (an array, a number, a string other than `"clear"`).
    #[error("unsupported message shape")]
    UnsupportedShape,
}

/// Why a WebSocket connection's loops terminated.
///
/// Errors are fully local to one connection: they close that connection
/// and nothing else. There is no error-reply frame in the protocol.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The peer sent a malformed frame.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Reading from or writing to the underlying channel failed.
    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),
}
