//! Request-scoped error responses.
//!
//! # Design Decisions
//! - Request errors become HTTP error responses, never a process crash
//! - 4xx/5xx bodies carry the correlation id for support lookup and
//!   nothing else about host internals

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::registry::ExtensionKind;

/// An error response for one request.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub correlation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl ApiError {
    /// No extension registered under this name in this category.
    pub fn not_found(kind: ExtensionKind, name: &str, correlation_id: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("no {kind} registered as {name:?}"),
            correlation_id: Some(correlation_id),
        }
    }

    /// Malformed request (envelope errors and the like).
    pub fn bad_request(message: impl Into<String>, correlation_id: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            correlation_id: Some(correlation_id),
        }
    }

    /// Request body exceeded the host limit.
    pub fn payload_too_large(correlation_id: String) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "request body too large".into(),
            correlation_id: Some(correlation_id),
        }
    }

    /// Handler failure; detail stays in the logs.
    pub fn internal(correlation_id: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "extension handler failed".into(),
            correlation_id: Some(correlation_id),
        }
    }

    /// The host closed while this request was still in flight.
    pub fn unavailable(correlation_id: String) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "host is shutting down".into(),
            correlation_id: Some(correlation_id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            correlation_id: self.correlation_id,
        };
        (self.status, Json(body)).into_response()
    }
}
