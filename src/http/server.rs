//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router over the frozen registries
//! - Wire up middleware (tracing, request timeout)
//! - Assign correlation ids, build the request context, dispatch to the
//!   matched category's registered handler
//! - Serve with graceful shutdown and a forced-close grace deadline
//!
//! # Design Decisions
//! - One dispatch route per category; the registered name is a path
//!   segment resolved against the registry at request time, so every
//!   reachable route corresponds to exactly one registration
//! - Correlation id assignment happens strictly before context
//!   construction, so every log line of a request's lifetime correlates
//! - Every in-flight dispatch races against coordinator close, so a
//!   forced close cuts handlers off instead of letting them finish
//!   after the transport is gone

use std::collections::HashMap;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::config::schema::HostConfig;
use crate::context::{ContextBuilder, CorrelationIdAssigner};
use crate::extensions::handler::ExtensionRequest;
use crate::health::HealthReporter;
use crate::http::error::ApiError;
use crate::lifecycle::shutdown::{ShutdownCoordinator, ShutdownState};
use crate::registry::{ExtensionKind, HostRegistry};

/// Upper bound on buffered request bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HostRegistry>,
    pub correlation: Arc<CorrelationIdAssigner>,
    pub context: Arc<ContextBuilder>,
    pub reporter: Arc<HealthReporter>,
    pub shutdown: Arc<ShutdownCoordinator>,
}

/// HTTP server for the extension host.
pub struct HttpServer {
    router: Router,
    shutdown: Arc<ShutdownCoordinator>,
}

impl HttpServer {
    /// Create a server over a frozen registry.
    ///
    /// The registry must be fully populated; registrations after this
    /// point are not reachable.
    pub fn new(
        config: &HostConfig,
        registry: Arc<HostRegistry>,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Result<Self, reqwest::Error> {
        let state = AppState {
            registry,
            correlation: Arc::new(CorrelationIdAssigner::new()),
            context: Arc::new(ContextBuilder::new(config.platform.clone())?),
            reporter: Arc::new(HealthReporter::new()),
            shutdown: Arc::clone(&shutdown),
        };

        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let router = Self::build_router(state, request_timeout);
        Ok(Self { router, shutdown })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/hooks/{name}", any(hook_handler))
            .route("/customize/{name}", any(customize_handler))
            .route("/functions/{name}", any(function_handler))
            .route("/proxy/{name}", any(proxy_handler))
            .route("/proxy/{name}/{*path}", any(proxy_path_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the coordinator drains it.
    ///
    /// On trigger the listener stops accepting and in-flight requests
    /// get the coordinator's grace delay to finish; after that the
    /// transport is force-released and the coordinator reaches Closed.
    /// A trigger fired before this call still takes effect: the state
    /// is level-checked, not edge-signalled.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut drain_rx = self.shutdown.watch();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.wait_for(|state| *state != ShutdownState::Running).await;
            })
            .into_future();
        tokio::pin!(serve);

        let mut state_rx = self.shutdown.watch();
        tokio::select! {
            result = &mut serve => {
                if let Err(ref err) = result {
                    tracing::error!(error = %err, "HTTP server error");
                }
                self.shutdown.mark_closed(result.is_ok());
                result
            }
            _ = async {
                let _ = state_rx.wait_for(|state| *state == ShutdownState::Draining).await;
            } => {
                match tokio::time::timeout(self.shutdown.grace(), &mut serve).await {
                    Ok(result) => {
                        if let Err(ref err) = result {
                            tracing::error!(error = %err, "HTTP server error during drain");
                        }
                        self.shutdown.mark_closed(result.is_ok());
                        result
                    }
                    Err(_) => {
                        // Grace delay elapsed with requests still in
                        // flight; marking Closed cuts off the racing
                        // dispatches and dropping the serve future
                        // releases the transport.
                        self.shutdown.mark_closed(false);
                        Ok(())
                    }
                }
            }
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    Json(state.reporter.snapshot(&state.registry)).into_response()
}

async fn hook_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request<Body>,
) -> Response {
    dispatch(state, ExtensionKind::Hook, name, String::new(), request).await
}

async fn customize_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request<Body>,
) -> Response {
    dispatch(state, ExtensionKind::Customize, name, String::new(), request).await
}

async fn function_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request<Body>,
) -> Response {
    dispatch(state, ExtensionKind::Function, name, String::new(), request).await
}

async fn proxy_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request<Body>,
) -> Response {
    dispatch(state, ExtensionKind::Proxy, name, String::new(), request).await
}

async fn proxy_path_handler(
    State(state): State<AppState>,
    Path((name, path)): Path<(String, String)>,
    request: Request<Body>,
) -> Response {
    dispatch(state, ExtensionKind::Proxy, name, path, request).await
}

/// Dispatch one request to the matched category's registered handler.
async fn dispatch(
    state: AppState,
    kind: ExtensionKind,
    name: String,
    sub_path: String,
    request: Request<Body>,
) -> Response {
    // Correlation id first: everything after this is attributable.
    let correlation_id = state.correlation.assign(request.headers());

    let Some(handler) = state
        .registry
        .lookup(kind, &name)
        .map(|registration| registration.handler())
    else {
        tracing::debug!(
            correlation_id = %correlation_id,
            kind = %kind,
            name = %name,
            "No extension registered"
        );
        return ApiError::not_found(kind, &name, correlation_id).into_response();
    };

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Failed to buffer request body"
            );
            return ApiError::payload_too_large(correlation_id).into_response();
        }
    };

    let ctx = match state.context.build(correlation_id.clone(), kind, &body_bytes) {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                kind = %kind,
                name = %name,
                error = %err,
                "Context construction failed"
            );
            return ApiError::bad_request(err.to_string(), correlation_id).into_response();
        }
    };

    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(query)| query)
        .unwrap_or_default();
    let extension_request = ExtensionRequest {
        method: parts.method,
        path: sub_path,
        query,
        headers: parts.headers,
        body: body_bytes,
    };

    let span = ctx.span.clone();
    let invocation = handler
        .handle(extension_request, Arc::clone(&ctx))
        .instrument(span);

    // Race the handler against coordinator close. After a forced close
    // the transport is gone; abandon the work instead of finishing it.
    let result = tokio::select! {
        result = invocation => result,
        _ = state.shutdown.wait_closed() => {
            tracing::warn!(
                correlation_id = %correlation_id,
                kind = %kind,
                name = %name,
                "Request abandoned at forced close"
            );
            return ApiError::unavailable(correlation_id).into_response();
        }
    };

    match result {
        Ok(response) => {
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(response.body)).into_response()
        }
        Err(err) => {
            tracing::error!(
                correlation_id = %correlation_id,
                kind = %kind,
                name = %name,
                error = %err,
                "Extension handler failed"
            );
            ApiError::internal(correlation_id).into_response()
        }
    }
}
