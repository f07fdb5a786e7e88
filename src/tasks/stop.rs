//! # Per-run stop request.
//!
//! [`StopRequest`] is the advisory cancellation value the control loop hands to
//! a running task body. It starts at the "no request" sentinel and moves to a
//! concrete [`Signal`] exactly once; later writes are refused.
//!
//! Task bodies either poll [`StopRequest::get`] at their checkpoints or await
//! [`StopRequest::requested`]. Nothing forces a body to stop.

use std::sync::atomic::{AtomicI32, Ordering};

use tokio_util::sync::CancellationToken;

use crate::core::Signal;

/// Raw value meaning "no stop requested".
pub const NO_REQUEST: i32 = -1;

/// Write-once stop request carrying the signal identifier.
#[derive(Debug)]
pub struct StopRequest {
    raw: AtomicI32,
    token: CancellationToken,
}

impl Default for StopRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl StopRequest {
    /// Creates a request slot holding the sentinel.
    pub fn new() -> Self {
        Self {
            raw: AtomicI32::new(NO_REQUEST),
            token: CancellationToken::new(),
        }
    }

    /// Sets the request to `signal`.
    ///
    /// Returns `false` if a request was already recorded; the first one is kept.
    pub fn request(&self, signal: Signal) -> bool {
        let stored = self
            .raw
            .compare_exchange(NO_REQUEST, signal.id(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if stored {
            self.token.cancel();
        }
        stored
    }

    /// Returns the requested signal, or `None` while still at the sentinel.
    #[inline]
    pub fn get(&self) -> Option<Signal> {
        Signal::from_id(self.raw.load(Ordering::Acquire))
    }

    /// Raw value (`NO_REQUEST` or a signal id).
    #[inline]
    pub fn raw(&self) -> i32 {
        self.raw.load(Ordering::Acquire)
    }

    /// Returns true once a stop has been requested.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.raw() != NO_REQUEST
    }

    /// Completes when a stop is requested and returns its signal.
    pub async fn requested(&self) -> Signal {
        self.token.cancelled().await;
        self.get().unwrap_or(Signal::Interrupt)
    }

    /// Token cancelled together with the request, for `select!`-style bodies.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_sentinel() {
        let stop = StopRequest::new();
        assert_eq!(stop.raw(), NO_REQUEST);
        assert!(!stop.is_requested());
        assert!(!stop.token().is_cancelled());
    }

    #[test]
    fn test_request_is_write_once() {
        let stop = StopRequest::new();
        assert!(stop.request(Signal::Terminate));
        assert!(!stop.request(Signal::Interrupt));
        assert_eq!(stop.get(), Some(Signal::Terminate));
        assert!(stop.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_requested_wakes_waiter() {
        let stop = std::sync::Arc::new(StopRequest::new());
        let waiter = {
            let stop = stop.clone();
            tokio::spawn(async move { stop.requested().await })
        };
        stop.request(Signal::Interrupt);
        assert_eq!(waiter.await.unwrap(), Signal::Interrupt);
    }
}
