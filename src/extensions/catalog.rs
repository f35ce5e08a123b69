//! Compiled-in catalog of handler builders.
//!
//! Descriptors name a handler id; the catalog resolves the id to a
//! builder and constructs the handler from the descriptor's options.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use serde_json::{json, Value};

use crate::context::RequestContext;
use crate::extensions::handler::{
    ExtensionHandler, ExtensionRequest, ExtensionResponse, HandlerError,
};
use crate::extensions::manifest::PluginManifest;
use crate::registry::ExtensionKind;

/// Error type for handler construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown handler id {0:?}")]
    UnknownHandler(String),

    #[error("handler {id:?} requires option {option:?}")]
    MissingOption { id: String, option: String },

    #[error("handler {id:?} option {option:?} has an invalid value")]
    InvalidOption { id: String, option: String },

    #[error("handler {id:?} is not available for the {kind} category")]
    KindMismatch { id: String, kind: ExtensionKind },
}

/// Resolves handler ids from plugin descriptors to handler instances.
pub struct HandlerCatalog {
    /// Outbound client shared by forwarding handlers.
    http: reqwest::Client,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Build the handler a descriptor names, for the given category.
    pub fn build(
        &self,
        kind: ExtensionKind,
        manifest: &PluginManifest,
    ) -> Result<Arc<dyn ExtensionHandler>, CatalogError> {
        match manifest.handler.as_str() {
            "echo" => Ok(Arc::new(EchoHandler)),

            "static" => {
                let body = match manifest.options.get("body") {
                    Some(value) => {
                        serde_json::to_value(value).map_err(|_| CatalogError::InvalidOption {
                            id: manifest.handler.clone(),
                            option: "body".into(),
                        })?
                    }
                    None => Value::Null,
                };
                let status = match manifest.option_int("status") {
                    Some(code) => {
                        u16::try_from(code).map_err(|_| CatalogError::InvalidOption {
                            id: manifest.handler.clone(),
                            option: "status".into(),
                        })?
                    }
                    None => 200,
                };
                Ok(Arc::new(StaticHandler { status, body }))
            }

            "forward" => {
                if kind != ExtensionKind::Proxy {
                    return Err(CatalogError::KindMismatch {
                        id: manifest.handler.clone(),
                        kind,
                    });
                }
                let target = manifest
                    .option_str("target")
                    .ok_or_else(|| CatalogError::MissingOption {
                        id: manifest.handler.clone(),
                        option: "target".into(),
                    })?
                    .trim_end_matches('/')
                    .to_string();
                Ok(Arc::new(ForwardHandler {
                    target,
                    client: self.http.clone(),
                }))
            }

            "platform-call" => {
                let path = manifest
                    .option_str("path")
                    .ok_or_else(|| CatalogError::MissingOption {
                        id: manifest.handler.clone(),
                        option: "path".into(),
                    })?
                    .to_string();
                Ok(Arc::new(PlatformCallHandler { path }))
            }

            other => Err(CatalogError::UnknownHandler(other.to_string())),
        }
    }
}

impl Default for HandlerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Responds with the normalized request view and context metadata.
struct EchoHandler;

#[async_trait]
impl ExtensionHandler for EchoHandler {
    async fn handle(
        &self,
        request: ExtensionRequest,
        ctx: Arc<RequestContext>,
    ) -> Result<ExtensionResponse, HandlerError> {
        Ok(ExtensionResponse::ok(json!({
            "handler": "echo",
            "method": request.method.as_str(),
            "path": request.path,
            "query": request.query,
            "correlationId": ctx.correlation_id,
            "user": ctx.user,
            "callerRequest": ctx.caller_request,
        })))
    }
}

/// Responds with a fixed body and status from the descriptor.
struct StaticHandler {
    status: u16,
    body: Value,
}

#[async_trait]
impl ExtensionHandler for StaticHandler {
    async fn handle(
        &self,
        _request: ExtensionRequest,
        _ctx: Arc<RequestContext>,
    ) -> Result<ExtensionResponse, HandlerError> {
        Ok(ExtensionResponse::with_status(
            self.status,
            self.body.clone(),
        ))
    }
}

/// Reverse-proxy passthrough to a configured target.
struct ForwardHandler {
    target: String,
    client: reqwest::Client,
}

#[async_trait]
impl ExtensionHandler for ForwardHandler {
    async fn handle(
        &self,
        request: ExtensionRequest,
        ctx: Arc<RequestContext>,
    ) -> Result<ExtensionResponse, HandlerError> {
        let url = if request.path.is_empty() {
            self.target.clone()
        } else {
            format!("{}/{}", self.target, request.path.trim_start_matches('/'))
        };

        tracing::debug!(
            correlation_id = %ctx.correlation_id,
            url = %url,
            "Forwarding to upstream"
        );

        let response = self
            .client
            .request(request.method.clone(), &url)
            .query(&request.query)
            .header(
                crate::context::CORRELATION_ID_HEADER,
                &ctx.correlation_id,
            )
            .body(request.body.clone())
            .send()
            .await
            .map_err(|err| HandlerError::Upstream(err.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| HandlerError::Upstream(err.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ExtensionResponse::with_status(status, body))
    }
}

/// Calls back into the platform and relays the result.
struct PlatformCallHandler {
    path: String,
}

#[async_trait]
impl ExtensionHandler for PlatformCallHandler {
    async fn handle(
        &self,
        request: ExtensionRequest,
        ctx: Arc<RequestContext>,
    ) -> Result<ExtensionResponse, HandlerError> {
        let payload = request.body_json();
        let result = ctx
            .platform
            .send(Method::POST, &self.path, payload.as_ref())
            .await?;
        Ok(ExtensionResponse::ok(result))
    }
}
