//! Per-category registry of extension handlers.
//!
//! # Design Decisions
//! - Insertion order is observable via `list_names` and preserved exactly
//!   (it reflects load order of extension files, useful for diagnosing
//!   duplicate or shadowing registrations)
//! - Duplicate names are rejected rather than overridden; the loader
//!   escalates the rejection to a startup-fatal error
//! - Immutable after startup (thread-safe without locks)

use std::collections::HashMap;
use std::sync::Arc;

use crate::extensions::handler::ExtensionHandler;
use crate::registry::entry::{ExtensionKind, RegistrationEntry};

/// Error type for registration operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {kind} registration: {name:?} is already registered")]
    DuplicateName { kind: ExtensionKind, name: String },
}

/// A registered extension: its entry plus the handler dispatched to.
pub struct Registration {
    entry: RegistrationEntry,
    handler: Arc<dyn ExtensionHandler>,
}

impl Registration {
    pub fn entry(&self) -> &RegistrationEntry {
        &self.entry
    }

    pub fn handler(&self) -> Arc<dyn ExtensionHandler> {
        Arc::clone(&self.handler)
    }
}

/// Ordered mapping from extension name to registration for one category.
pub struct CategoryRegistry {
    kind: ExtensionKind,
    entries: Vec<Registration>,
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new(kind: ExtensionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ExtensionKind {
        self.kind
    }

    /// Register a named handler, making its route reachable.
    ///
    /// Must only be called before the transport starts serving; registries
    /// are not designed for hot reload.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ExtensionHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName {
                kind: self.kind,
                name,
            });
        }

        let entry = RegistrationEntry::new(self.kind, name.clone());
        tracing::debug!(
            kind = %self.kind,
            name = %name,
            url_pattern = %entry.url_pattern,
            "Extension registered"
        );

        self.index.insert(name, self.entries.len());
        self.entries.push(Registration { entry, handler });
        Ok(())
    }

    /// Look up a registration by name.
    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Registered names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
