//! # Runtime events emitted by the supervisor and its workers.
//!
//! The [`EventKind`] enum classifies events into three groups:
//! - **Worker lifecycle**: starting, refused, stopped, panicked, exited
//! - **Shutdown flow**: signal received, shutdown requested, stop requested, all stopped
//! - **Subscriber health**: overflow and panic of event subscribers
//!
//! The [`Event`] struct carries the optional metadata (worker name, signal,
//! result code, reason) that each kind sets.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use workvisor::{Event, EventKind, Signal};
//!
//! let ev = Event::new(EventKind::StopRequested)
//!     .with_worker("example-worker-demo")
//!     .with_signal(Signal::Terminate);
//!
//! assert_eq!(ev.kind, EventKind::StopRequested);
//! assert_eq!(ev.worker.as_deref(), Some("example-worker-demo"));
//! assert_eq!(ev.signal, Some(Signal::Terminate));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::Signal;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker lifecycle ===
    /// A worker spawned its task body.
    ///
    /// Sets: `worker`.
    WorkerStarting,

    /// A worker refused to start (already running or no task body).
    ///
    /// Sets: `worker`, `reason`.
    WorkerStartRefused,

    /// A task body returned.
    ///
    /// Sets: `worker`, `code` (last result), `reason` (only when the body returned an error).
    WorkerStopped,

    /// A task body panicked.
    ///
    /// Sets: `worker`, `reason` (panic message).
    WorkerPanicked,

    /// The control loop observed a worker that is no longer running
    /// while no shutdown was in progress.
    ///
    /// Sets: `worker`.
    WorkerExited,

    // === Shutdown flow ===
    /// The signal bridge recorded an OS termination signal.
    ///
    /// Sets: `signal`.
    SignalReceived,

    /// The control loop left its polling phase.
    ///
    /// Sets: `signal` (the identifier assigned to every worker),
    /// `worker` (when the trigger was an unsolicited exit).
    ShutdownRequested,

    /// A stop request was written to a worker.
    ///
    /// Sets: `worker`, `signal`.
    StopRequested,

    /// Every worker reports not running.
    AllStopped,

    /// Workers did not stop before the shutdown deadline.
    ///
    /// Sets: `reason` (stuck workers).
    DeadlineExceeded,

    // === Subscriber health ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `worker` (subscriber name), `reason`.
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `worker` (subscriber name), `reason`.
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker (or subscriber), if applicable.
    pub worker: Option<Arc<str>>,
    /// Signal identifier, if applicable.
    pub signal: Option<Signal>,
    /// Result code reported by a finished task body.
    pub code: Option<i32>,
    /// Human-readable reason (errors, panic messages, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            signal: None,
            code: None,
            reason: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a signal identifier.
    #[inline]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Attaches a result code.
    #[inline]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::AllStopped);
        let b = Event::new(EventKind::AllStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builder_sets_fields() {
        let ev = Event::new(EventKind::WorkerStopped)
            .with_worker("w")
            .with_code(3)
            .with_reason("boom");
        assert_eq!(ev.worker.as_deref(), Some("w"));
        assert_eq!(ev.code, Some(3));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert!(ev.signal.is_none());
    }
}
