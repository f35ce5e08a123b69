//! Host-wide registry owning the four category registries.

use std::sync::Arc;

use crate::extensions::handler::ExtensionHandler;
use crate::registry::category::{CategoryRegistry, Registration, RegistryError};
use crate::registry::entry::ExtensionKind;

/// The four category registries, constructed once at boot and injected
/// into every component that needs them.
///
/// Written only during startup loading; the server freezes the registry
/// into an `Arc` before the listener starts, after which it is read-only.
pub struct HostRegistry {
    hooks: CategoryRegistry,
    proxies: CategoryRegistry,
    customizes: CategoryRegistry,
    functions: CategoryRegistry,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self {
            hooks: CategoryRegistry::new(ExtensionKind::Hook),
            proxies: CategoryRegistry::new(ExtensionKind::Proxy),
            customizes: CategoryRegistry::new(ExtensionKind::Customize),
            functions: CategoryRegistry::new(ExtensionKind::Function),
        }
    }

    pub fn category(&self, kind: ExtensionKind) -> &CategoryRegistry {
        match kind {
            ExtensionKind::Hook => &self.hooks,
            ExtensionKind::Proxy => &self.proxies,
            ExtensionKind::Customize => &self.customizes,
            ExtensionKind::Function => &self.functions,
        }
    }

    fn category_mut(&mut self, kind: ExtensionKind) -> &mut CategoryRegistry {
        match kind {
            ExtensionKind::Hook => &mut self.hooks,
            ExtensionKind::Proxy => &mut self.proxies,
            ExtensionKind::Customize => &mut self.customizes,
            ExtensionKind::Function => &mut self.functions,
        }
    }

    /// Register a named handler under the given category.
    pub fn register(
        &mut self,
        kind: ExtensionKind,
        name: impl Into<String>,
        handler: Arc<dyn ExtensionHandler>,
    ) -> Result<(), RegistryError> {
        self.category_mut(kind).register(name, handler)
    }

    /// Look up a registration across one category.
    pub fn lookup(&self, kind: ExtensionKind, name: &str) -> Option<&Registration> {
        self.category(kind).get(name)
    }

    /// Total number of registrations across all categories.
    pub fn total(&self) -> usize {
        ExtensionKind::ALL
            .iter()
            .map(|&kind| self.category(kind).len())
            .sum()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}
