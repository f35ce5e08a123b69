//! Extension registries.
//!
//! # Responsibilities
//! - Record which extension names are registered per category
//! - Preserve registration order (mirrors load order of extension files)
//! - Reject duplicate names within a category
//!
//! # Design Decisions
//! - One `CategoryRegistry` per extension kind, owned by `HostRegistry`
//! - `HostRegistry` is an explicit object passed to components, not a global
//! - Registries are written only during startup loading; the server freezes
//!   them into an `Arc` before accepting traffic, so reads need no locks

pub mod category;
pub mod entry;
pub mod host;

pub use category::{CategoryRegistry, Registration, RegistryError};
pub use entry::{ExtensionKind, RegistrationEntry};
pub use host::HostRegistry;
