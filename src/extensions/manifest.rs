//! Plugin descriptor schema.
//!
//! Each file the loader discovers is a TOML descriptor naming the
//! extension and the catalog handler backing it:
//!
//! ```toml
//! name = "orders"
//! handler = "forward"
//!
//! [options]
//! target = "http://orders.internal:8080"
//! ```

use serde::Deserialize;

use crate::registry::ExtensionKind;

/// Parsed plugin descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Extension name; becomes the route's name segment.
    pub name: String,

    /// Catalog handler id backing this extension.
    pub handler: String,

    /// Optional declared kind; must match the directory it was found in.
    #[serde(default)]
    pub kind: Option<ExtensionKind>,

    /// Handler-specific options.
    #[serde(default)]
    pub options: toml::Table,
}

impl PluginManifest {
    /// String option, if present.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|value| value.as_str())
    }

    /// Integer option, if present.
    pub fn option_int(&self, key: &str) -> Option<i64> {
        self.options.get(key).and_then(|value| value.as_integer())
    }
}
