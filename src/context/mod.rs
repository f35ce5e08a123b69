//! Per-request execution context.
//!
//! # Responsibilities
//! - Assign a correlation id to every inbound request
//! - Extract the caller-request envelope and optional identity claim
//! - Bind a platform client to the caller request with a hard timeout
//!
//! # Design Decisions
//! - Context is built exactly once per request, before the handler runs,
//!   and passed to the handler as an explicit parameter (never ambient)
//! - Read-only after construction; handlers never write back into it
//! - Missing identity is not an error: the handler decides on rejection

pub mod builder;
pub mod correlation;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform::PlatformClient;

pub use builder::{ContextBuilder, ContextError};
pub use correlation::{CorrelationIdAssigner, CORRELATION_ID_HEADER};

/// Identity claim carried in the request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Caller identifier.
    pub id: String,

    /// Remaining claim fields, passed through untouched.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

/// Context threaded into every extension handler invocation.
///
/// Created immediately before the matched handler runs, discarded when
/// the response is sent. Never shared across requests.
pub struct RequestContext {
    /// Identifier correlating every log line of this request's lifetime.
    pub correlation_id: String,

    /// Span carrying the correlation id; handler work runs inside it.
    pub span: tracing::Span,

    /// Identity claim from the envelope; `None` means unauthenticated.
    pub user: Option<UserIdentity>,

    /// Snapshot of the originating external request, passed through opaque.
    pub caller_request: Value,

    /// Client for calling back into the owning platform, bound to the
    /// caller request and a fixed hard timeout.
    pub platform: PlatformClient,
}
