//! Platform client capability.
//!
//! # Responsibilities
//! - Send requests to the owning platform on behalf of the caller
//! - Enforce a fixed hard timeout per call, independent of the outer
//!   request timeout
//! - Surface failures as typed errors the handler can match on
//!
//! # Design Decisions
//! - No automatic retries; retry policy belongs to the handler
//! - The correlation id and caller-request snapshot travel with every call

use std::time::Duration;

use axum::http::Method;
use serde_json::Value;

use crate::config::schema::PlatformConfig;
use crate::context::CORRELATION_ID_HEADER;

/// Error type for platform calls. Timeouts propagate to the handler as
/// an ordinary failure, never a silent drop.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("platform call timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("platform call failed: {0}")]
    Transport(String),

    #[error("platform returned status {status}")]
    Status { status: u16 },

    #[error("platform response was not valid JSON: {0}")]
    Decode(String),
}

/// Client bound to one request's caller-request snapshot.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    correlation_id: String,
    caller_request: Value,
}

impl PlatformClient {
    /// Bind a client to one request.
    ///
    /// `http` must already carry the platform call timeout.
    pub fn bind(
        http: reqwest::Client,
        config: &PlatformConfig,
        correlation_id: String,
        caller_request: Value,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.call_timeout(),
            correlation_id,
            caller_request,
        }
    }

    /// Caller-request snapshot this client is bound to.
    pub fn caller_request(&self) -> &Value {
        &self.caller_request
    }

    /// Send a request to the platform and decode the JSON response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, PlatformError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self
            .http
            .request(method, &url)
            .header(CORRELATION_ID_HEADER, &self.correlation_id);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                PlatformError::Timeout {
                    timeout: self.timeout,
                }
            } else {
                PlatformError::Transport(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|err| PlatformError::Decode(err.to_string()))
    }
}
