//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. Publishers are
//! the control loop, the worker tasks and the signal bridge; the only receiver
//! the runtime creates is the supervisor's subscriber listener.
//!
//! ```text
//! Publishers:                         Receiver:
//!   Worker task 1 ──┐
//!   Worker task N ──┼──► Bus ───► subscriber listener ───► SubscriberSet
//!   Control loop  ──┤   (broadcast)   (in Supervisor)
//!   Signal bridge ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks.
//! - Events sent while there are no receivers are dropped.
//! - Slow receivers get `RecvError::Lagged(n)` and skip the `n` oldest items.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cloning is cheap (the sender is `Arc`-backed).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes subsequently published events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_receiver() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::AllStopped));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::AllStopped);
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::AllStopped));
    }
}
