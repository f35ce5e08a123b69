//! Health status reporting.
//!
//! # Responsibilities
//! - Produce a status snapshot from the live registries and process
//!   start time
//!
//! # Design Decisions
//! - Computed on demand from registry contents; no caching, so the
//!   report can never go stale
//! - Never blocks, never fails: empty registries report empty lists

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::registry::{ExtensionKind, HostRegistry};

/// Point-in-time status report. Derived, not stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub started_at: String,
    pub registered: RegisteredNames,
}

/// Registered extension names per category, in registration order.
#[derive(Debug, Serialize)]
pub struct RegisteredNames {
    pub hooks: Vec<String>,
    pub customizes: Vec<String>,
    pub proxies: Vec<String>,
    pub functions: Vec<String>,
}

/// Reads the registries and process start time on demand.
pub struct HealthReporter {
    started_at: DateTime<Utc>,
}

impl HealthReporter {
    /// Create a reporter pinned to the current instant as start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    pub fn snapshot(&self, registry: &HostRegistry) -> HealthSnapshot {
        HealthSnapshot {
            status: "ok",
            started_at: self.started_at.to_rfc3339(),
            registered: RegisteredNames {
                hooks: registry.category(ExtensionKind::Hook).list_names(),
                customizes: registry.category(ExtensionKind::Customize).list_names(),
                proxies: registry.category(ExtensionKind::Proxy).list_names(),
                functions: registry.category(ExtensionKind::Function).list_names(),
            },
        }
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::handler::{
        ExtensionHandler, ExtensionRequest, ExtensionResponse, HandlerError,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoopHandler;

    #[async_trait]
    impl ExtensionHandler for NoopHandler {
        async fn handle(
            &self,
            _request: ExtensionRequest,
            _ctx: Arc<crate::context::RequestContext>,
        ) -> Result<ExtensionResponse, HandlerError> {
            Ok(ExtensionResponse::ok(serde_json::Value::Null))
        }
    }

    #[test]
    fn test_empty_registries_report_ok() {
        let reporter = HealthReporter::new();
        let snapshot = reporter.snapshot(&HostRegistry::new());

        assert_eq!(snapshot.status, "ok");
        assert!(snapshot.registered.hooks.is_empty());
        assert!(snapshot.registered.customizes.is_empty());
        assert!(snapshot.registered.proxies.is_empty());
        assert!(snapshot.registered.functions.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_live_registry() {
        let mut registry = HostRegistry::new();
        registry
            .register(ExtensionKind::Proxy, "orders", Arc::new(NoopHandler))
            .unwrap();

        let reporter = HealthReporter::new();
        let snapshot = reporter.snapshot(&registry);

        assert_eq!(snapshot.registered.proxies, vec!["orders"]);
        assert!(snapshot.registered.hooks.is_empty());
        assert!(snapshot.registered.functions.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let reporter = HealthReporter::new();
        let json = serde_json::to_value(reporter.snapshot(&HostRegistry::new())).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json.get("startedAt").is_some());
        assert!(json["registered"]["hooks"].is_array());
    }
}
