//! Correlation-id assignment.
//!
//! # Design Decisions
//! - A caller-supplied id is used verbatim (enables cross-service trace
//!   correlation), even if it collides with a generated value
//! - Generated ids are a process-scoped monotonic counter starting at 1,
//!   never reused, not persisted across restarts

use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::HeaderMap;

/// Header a caller uses to supply its own correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Derives a per-request identifier.
pub struct CorrelationIdAssigner {
    next: AtomicU64,
}

impl CorrelationIdAssigner {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Return the caller-supplied id verbatim, or the next generated value.
    pub fn assign(&self, headers: &HeaderMap) -> String {
        match headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            Some(supplied) => supplied.to_string(),
            None => self.next.fetch_add(1, Ordering::Relaxed).to_string(),
        }
    }
}

impl Default for CorrelationIdAssigner {
    fn default() -> Self {
        Self::new()
    }
}
