//! Shutdown coordination for the host.
//!
//! State machine: `Running -> Draining -> Closed`.
//! - `Running -> Draining`: termination signal; the transport stops
//!   accepting but lets in-flight requests continue
//! - `Draining -> Closed`: the drain completed, or the grace delay
//!   elapsed and transport resources were force-released

use std::time::Duration;

use tokio::sync::watch;

/// Coordinator lifecycle states. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Draining,
    Closed,
}

/// Coordinator for graceful shutdown.
///
/// State lives in a `watch` channel, so observers see the current state
/// even when they start watching after a transition happened. A trigger
/// fired before the server loop begins is not lost.
pub struct ShutdownCoordinator {
    /// Observable lifecycle state.
    state: watch::Sender<ShutdownState>,

    /// Grace delay before in-flight requests are abandoned.
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace: Duration) -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self { state, grace }
    }

    /// Watch lifecycle state transitions.
    pub fn watch(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    /// Grace delay before forced close.
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Begin draining: stop accepting new requests, let in-flight ones
    /// continue. Idempotent; has no effect once Closed.
    pub fn trigger(&self) {
        let transitioned = self.state.send_if_modified(|state| {
            if *state == ShutdownState::Running {
                *state = ShutdownState::Draining;
                true
            } else {
                false
            }
        });

        if transitioned {
            tracing::info!("Shutdown triggered, draining in-flight requests");
        }
    }

    /// Record that transport resources have been released.
    ///
    /// `clean` is false when the grace delay forced the close or serving
    /// ended with an error.
    pub fn mark_closed(&self, clean: bool) {
        self.state.send_replace(ShutdownState::Closed);
        if clean {
            tracing::info!(clean = true, "Shutdown complete");
        } else {
            tracing::warn!(clean = false, "Shutdown forced");
        }
    }

    /// Resolve once the coordinator reaches Closed. Resolves immediately
    /// when already Closed.
    pub async fn wait_closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == ShutdownState::Closed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_state_machine_progression() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        assert_eq!(coordinator.state(), ShutdownState::Running);

        coordinator.trigger();
        assert_eq!(coordinator.state(), ShutdownState::Draining);

        coordinator.mark_closed(true);
        assert_eq!(coordinator.state(), ShutdownState::Closed);
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        let mut rx = coordinator.watch();

        coordinator.trigger();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ShutdownState::Draining);

        // The second trigger modifies nothing.
        coordinator.trigger();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_trigger_after_closed_stays_closed() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        coordinator.trigger();
        coordinator.mark_closed(false);

        coordinator.trigger();
        assert_eq!(coordinator.state(), ShutdownState::Closed);
    }

    #[tokio::test]
    async fn test_watcher_sees_trigger_fired_before_watching() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
        coordinator.trigger();

        // A receiver created after the transition still observes it.
        let mut rx = coordinator.watch();
        let state = rx
            .wait_for(|state| *state != ShutdownState::Running)
            .await
            .unwrap();
        assert_eq!(*state, ShutdownState::Draining);
    }

    #[tokio::test]
    async fn test_wait_closed_wakes_on_close() {
        let coordinator = Arc::new(ShutdownCoordinator::new(Duration::from_secs(1)));

        let waiter = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.wait_closed().await })
        };

        coordinator.trigger();
        coordinator.mark_closed(true);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_closed never resolved")
            .unwrap();
    }
}
