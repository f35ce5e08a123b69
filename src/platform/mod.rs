//! Outbound client for calling back into the owning platform.

pub mod client;

pub use client::{PlatformClient, PlatformError};
