//! Host configuration.
//!
//! # Data Flow
//! ```text
//! TOML file → serde (schema.rs) → semantic validation (validation.rs) →
//! accepted HostConfig (loader.rs)
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::HostConfig;
