//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Load extensions → Freeze registries →
//!     Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight → Close
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then extensions, listener last
//! - Shutdown has a grace deadline: forced close after it elapses
//! - Failure during shutdown is logged, never blocks reaching Closed

pub mod shutdown;
pub mod signals;

pub use shutdown::{ShutdownCoordinator, ShutdownState};
