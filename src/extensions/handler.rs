//! Extension handler contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde_json::Value;

use crate::context::RequestContext;
use crate::platform::PlatformError;

/// Error type surfaced by extension handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("{0}")]
    Failed(String),
}

/// Normalized view of the inbound request handed to handlers.
#[derive(Debug, Clone)]
pub struct ExtensionRequest {
    pub method: Method,

    /// Trailing path below the extension's mount point (proxy
    /// passthroughs); empty for the other categories.
    pub path: String,

    pub query: HashMap<String, String>,

    pub headers: HeaderMap,

    /// Raw request body; the envelope has already been consumed by the
    /// context builder.
    pub body: Bytes,
}

impl ExtensionRequest {
    /// Body parsed as JSON, if it is JSON.
    pub fn body_json(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}

/// Response produced by a handler, rendered as JSON.
#[derive(Debug, Clone)]
pub struct ExtensionResponse {
    pub status: u16,
    pub body: Value,
}

impl ExtensionResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// A user-supplied extension handler.
///
/// Handlers receive the normalized request plus the shared context; they
/// never construct a context themselves.
#[async_trait]
pub trait ExtensionHandler: Send + Sync {
    async fn handle(
        &self,
        request: ExtensionRequest,
        ctx: Arc<RequestContext>,
    ) -> Result<ExtensionResponse, HandlerError>;
}
