//! Registration entry and extension kind definitions.

use serde::{Deserialize, Serialize};

/// The four categories of extension handlers the host dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Hook,
    Proxy,
    Customize,
    Function,
}

impl ExtensionKind {
    /// All kinds, in the order the loader scans their directories.
    pub const ALL: [ExtensionKind; 4] = [
        ExtensionKind::Hook,
        ExtensionKind::Proxy,
        ExtensionKind::Customize,
        ExtensionKind::Function,
    ];

    /// Directory name the loader scans for this category.
    pub fn directory(&self) -> &'static str {
        match self {
            ExtensionKind::Hook => "hooks",
            ExtensionKind::Proxy => "proxies",
            ExtensionKind::Customize => "customizes",
            ExtensionKind::Function => "functions",
        }
    }

    /// User-visible route for a registered name, substituted into the
    /// category's URL template.
    pub fn url_pattern(&self, name: &str) -> String {
        match self {
            ExtensionKind::Hook => format!("/hooks/{name}"),
            ExtensionKind::Proxy => format!("/proxy/{name}"),
            ExtensionKind::Customize => format!("/customize/{name}"),
            ExtensionKind::Function => format!("/functions/{name}"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionKind::Hook => "hook",
            ExtensionKind::Proxy => "proxy",
            ExtensionKind::Customize => "customize",
            ExtensionKind::Function => "function",
        }
    }
}

impl std::fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record created when an extension announces itself to its category
/// registry. Identity is `(kind, name)`; immutable after creation and
/// lives for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationEntry {
    /// Extension-chosen name, unique within the category.
    pub name: String,

    /// Category the extension registered under.
    pub kind: ExtensionKind,

    /// Route the registration made reachable.
    pub url_pattern: String,
}

impl RegistrationEntry {
    pub fn new(kind: ExtensionKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let url_pattern = kind.url_pattern(&name);
        Self {
            name,
            kind,
            url_pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_patterns_carry_name_segment() {
        assert_eq!(ExtensionKind::Hook.url_pattern("audit"), "/hooks/audit");
        assert_eq!(ExtensionKind::Proxy.url_pattern("orders"), "/proxy/orders");
        assert_eq!(
            ExtensionKind::Customize.url_pattern("pricing"),
            "/customize/pricing"
        );
        assert_eq!(
            ExtensionKind::Function.url_pattern("report"),
            "/functions/report"
        );
    }

    #[test]
    fn test_entry_identity() {
        let entry = RegistrationEntry::new(ExtensionKind::Proxy, "orders");
        assert_eq!(entry.name, "orders");
        assert_eq!(entry.kind, ExtensionKind::Proxy);
        assert_eq!(entry.url_pattern, "/proxy/orders");
    }
}
