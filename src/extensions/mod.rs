//! Extension handlers and startup discovery.
//!
//! # Data Flow
//! ```text
//! Startup (loader.rs):
//!     Scan category dirs → Sort paths → Parse descriptors →
//!     Build handlers (catalog.rs) → Register with HostRegistry
//!
//! Dispatch (handler.rs):
//!     Matched route → handler.handle(request, context) → response
//! ```
//!
//! # Design Decisions
//! - Descriptors are explicit files invoked through one uniform
//!   registration path, not load-time side effects
//! - A broken descriptor aborts startup; a server silently missing
//!   capabilities is worse than one that fails to boot

pub mod catalog;
pub mod handler;
pub mod loader;
pub mod manifest;

pub use catalog::{CatalogError, HandlerCatalog};
pub use handler::{ExtensionHandler, ExtensionRequest, ExtensionResponse, HandlerError};
pub use loader::{ExtensionLoader, LoadSummary, LoaderError};
pub use manifest::PluginManifest;
