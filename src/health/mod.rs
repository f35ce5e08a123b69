//! Health reporting.

pub mod reporter;

pub use reporter::{HealthReporter, HealthSnapshot, RegisteredNames};
