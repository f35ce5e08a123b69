//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals to a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Signal delivery failures are logged and treated as non-fatal; the
//!   host keeps serving rather than dying over a handler install error

use std::sync::Arc;

use crate::lifecycle::shutdown::ShutdownCoordinator;

/// Wait for a termination signal from the host environment.
#[cfg(unix)]
pub async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "Failed to install SIGTERM handler");
            // Fall back to Ctrl+C only.
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            }
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!(signal = "SIGTERM", "Termination signal received");
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            } else {
                tracing::info!(signal = "SIGINT", "Termination signal received");
            }
        }
    }
}

#[cfg(not(unix))]
pub async fn wait_for_termination() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
    } else {
        tracing::info!(signal = "SIGINT", "Termination signal received");
    }
}

/// Spawn a task that triggers the coordinator on the first termination
/// signal.
pub fn spawn_signal_listener(shutdown: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });
}
