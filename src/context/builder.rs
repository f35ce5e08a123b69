//! Request context construction.

use serde::Deserialize;
use serde_json::Value;

use crate::config::schema::PlatformConfig;
use crate::context::{RequestContext, UserIdentity};
use crate::platform::PlatformClient;
use crate::registry::ExtensionKind;

/// Error type for context construction.
///
/// These become 4xx responses carrying only the correlation id; no
/// internal detail is leaked.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("request envelope is not valid JSON")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("request envelope is missing the caller request field")]
    MissingCallerRequest,
}

/// Well-known envelope fields of the inbound request body.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    /// Optional identity claim. Absent means unauthenticated; rejection
    /// is the handler's call, not the builder's.
    #[serde(default)]
    user: Option<UserIdentity>,

    /// Snapshot of the originating external request.
    #[serde(default)]
    request: Option<Value>,
}

/// Builds the `RequestContext` injected into every handler invocation.
pub struct ContextBuilder {
    http: reqwest::Client,
    platform: PlatformConfig,
}

impl ContextBuilder {
    /// Create a builder sharing one outbound client across requests.
    ///
    /// The client carries the platform call timeout, a hard upper bound
    /// independent of the outer request's own timeout.
    pub fn new(platform: PlatformConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(platform.call_timeout())
            .build()?;
        Ok(Self { http, platform })
    }

    /// Assemble the context for one request.
    ///
    /// An empty body is an absent envelope: null caller request, no
    /// identity. For hook, customize and function dispatch a non-empty
    /// body must parse as a JSON envelope carrying the caller request;
    /// only the identity claim is optional. Proxy passthrough bodies are
    /// opaque: envelope fields are honored when the full envelope
    /// parses, and anything else rides through untouched.
    pub fn build(
        &self,
        correlation_id: String,
        kind: ExtensionKind,
        body: &[u8],
    ) -> Result<RequestContext, ContextError> {
        let envelope = if kind == ExtensionKind::Proxy {
            parse_envelope(body).unwrap_or_default()
        } else {
            parse_envelope(body)?
        };

        let span = tracing::info_span!("request", correlation_id = %correlation_id);
        let caller_request = envelope.request.unwrap_or(Value::Null);

        let platform = PlatformClient::bind(
            self.http.clone(),
            &self.platform,
            correlation_id.clone(),
            caller_request.clone(),
        );

        Ok(RequestContext {
            correlation_id,
            span,
            user: envelope.user,
            caller_request,
            platform,
        })
    }
}

fn parse_envelope(body: &[u8]) -> Result<Envelope, ContextError> {
    if body.is_empty() {
        return Ok(Envelope::default());
    }

    let envelope: Envelope =
        serde_json::from_slice(body).map_err(ContextError::MalformedEnvelope)?;
    if envelope.request.is_none() {
        return Err(ContextError::MissingCallerRequest);
    }
    Ok(envelope)
}
