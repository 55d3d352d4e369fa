//! One-shot lifecycle events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// A one-shot broadcast event.
///
/// Fires at most once. Waiters parked on [`Event::wait`] are all released on
/// firing; waiters arriving afterwards return immediately. The fired flag
/// uses release/acquire ordering, so anything written before [`Event::fire`]
/// is visible to an observer of [`Event::is_fired`].
#[derive(Debug, Clone)]
pub struct Event {
    tx: broadcast::Sender<()>,
    fired: Arc<AtomicBool>,
}

impl Event {
    /// Create an unfired event.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fire the event. Only the first call has any effect.
    pub fn fire(&self) {
        if !self.fired.swap(true, Ordering::AcqRel) {
            // Waiters subscribed before this point receive the message;
            // later ones observe the flag instead.
            let _ = self.tx.send(());
        }
    }

    /// Whether the event has fired.
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Wait until the event fires. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        if self.is_fired() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of host lifecycle events the gate consumes.
///
/// The host fires `started` once it has begun accepting traffic, and
/// `stopping` when shutdown begins. `stopping` doubles as the cooperative
/// cancellation signal handed to the startup initializer.
#[derive(Debug, Clone, Default)]
pub struct AppLifetime {
    started: Event,
    stopping: Event,
}

impl AppLifetime {
    /// Create a lifetime with both events unfired.
    pub fn new() -> Self {
        Self::default()
    }

    /// The started event.
    pub fn started(&self) -> &Event {
        &self.started
    }

    /// The stopping event.
    pub fn stopping(&self) -> &Event {
        &self.stopping
    }

    /// Signal that the host has begun accepting traffic.
    pub fn notify_started(&self) {
        self.started.fire();
    }

    /// Signal that shutdown has begun.
    pub fn notify_stopping(&self) {
        self.stopping.fire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_released_on_fire() {
        let event = Event::new();
        let waiter = {
            let event = event.clone();
            tokio::spawn(async move { event.wait().await })
        };

        tokio::task::yield_now().await;
        assert!(!event.is_fired());

        event.fire();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released")
            .unwrap();
        assert!(event.is_fired());
    }

    #[tokio::test]
    async fn test_wait_after_fire_returns_immediately() {
        let event = Event::new();
        event.fire();
        tokio::time::timeout(Duration::from_millis(100), event.wait())
            .await
            .expect("late waiter should not park");
    }

    #[tokio::test]
    async fn test_fire_is_idempotent() {
        let event = Event::new();
        event.fire();
        event.fire();
        assert!(event.is_fired());

        tokio::time::timeout(Duration::from_millis(100), event.wait())
            .await
            .expect("waiter should not park");
    }

    #[tokio::test]
    async fn test_all_waiters_released() {
        let event = Event::new();
        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let event = event.clone();
                tokio::spawn(async move { event.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        event.fire();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("every waiter should be released")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_lifetime_events_are_independent() {
        let lifetime = AppLifetime::new();
        lifetime.notify_started();
        assert!(lifetime.started().is_fired());
        assert!(!lifetime.stopping().is_fired());

        lifetime.notify_stopping();
        assert!(lifetime.stopping().is_fired());
    }
}
