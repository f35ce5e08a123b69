//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files;
//! every section has workable defaults so a missing file still boots a
//! local host.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the extension host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Platform callback client settings.
    pub platform: PlatformConfig,

    /// Extension discovery settings.
    pub extensions: ExtensionsConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Platform callback client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base URL of the owning platform.
    pub base_url: String,

    /// Hard upper bound for one platform call, independent of the
    /// inbound request timeout.
    pub call_timeout_secs: u64,
}

impl PlatformConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4004".to_string(),
            call_timeout_secs: 20,
        }
    }
}

/// Extension discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    /// Root directory holding the four category directories.
    pub root_dir: String,

    /// Scan for development artifacts instead of packaged ones.
    pub dev_artifacts: bool,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            root_dir: "extensions".to_string(),
            dev_artifacts: false,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Graceful shutdown settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Grace delay before in-flight requests are abandoned and transport
    /// resources force-released.
    pub grace_secs: u64,
}

impl ShutdownConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { grace_secs: 10 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "extension_host=info,tower_http=info".to_string(),
        }
    }
}
