//! # Signal bridge: OS termination signals → cooperative shutdown state.
//!
//! The control loop never reacts to a signal directly. Instead the bridge
//! records the signal in a [`SignalSlot`] and the loop observes the slot on its
//! next tick.
//!
//! ```text
//! SIGINT / SIGTERM ──► listener task ──► SignalSlot::raise(sig)
//!                                             │
//!                   control loop tick ◄── SignalSlot::get()
//! ```
//!
//! ## Rules
//! - "Shutdown requested" and "which signal" live in one `AtomicI32`
//!   (0 = none, otherwise the signal id), so a reader can never see the flag
//!   set with a stale identifier.
//! - A later signal overwrites an earlier one (last signal wins).
//!
//! ## Signals
//! **Unix:** `SIGINT` (Ctrl-C) and `SIGTERM` (default kill signal).
//!
//! **Other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`], recorded as [`Signal::Interrupt`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use tokio::task::JoinHandle;

use crate::events::{Bus, Event, EventKind};

/// Termination signals understood by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` (2). Also used when a worker exits on its own.
    Interrupt,
    /// `SIGTERM` (15).
    Terminate,
}

impl Signal {
    /// Conventional POSIX signal number.
    pub const fn id(self) -> i32 {
        match self {
            Signal::Interrupt => 2,
            Signal::Terminate => 15,
        }
    }

    /// Maps a POSIX signal number back to a [`Signal`].
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            2 => Some(Signal::Interrupt),
            15 => Some(Signal::Terminate),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => f.write_str("SIGINT"),
            Signal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

const NO_SIGNAL: i32 = 0;

/// Process-wide "shutdown requested" state written by the signal bridge and
/// read by the control loop.
#[derive(Debug, Default)]
pub struct SignalSlot {
    raw: AtomicI32,
}

impl SignalSlot {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            raw: AtomicI32::new(NO_SIGNAL),
        }
    }

    /// Records `signal`, replacing any previously recorded one.
    #[inline]
    pub fn raise(&self, signal: Signal) {
        self.raw.store(signal.id(), Ordering::Release);
    }

    /// Returns the recorded signal, if any.
    #[inline]
    pub fn get(&self) -> Option<Signal> {
        Signal::from_id(self.raw.load(Ordering::Acquire))
    }

    /// Returns true once any signal has been recorded.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.get().is_some()
    }
}

/// Registers the OS listeners and spawns the bridge task.
///
/// Registration happens before this function returns, so an `Err` means no
/// listener is active. The spawned task runs until the runtime shuts down or
/// the returned handle is aborted.
#[cfg(unix)]
pub fn install(slot: Arc<SignalSlot>, bus: Bus) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let sig = tokio::select! {
                Some(()) = sigint.recv() => Signal::Interrupt,
                Some(()) = sigterm.recv() => Signal::Terminate,
                else => break,
            };
            slot.raise(sig);
            bus.publish(Event::new(EventKind::SignalReceived).with_signal(sig));
        }
    }))
}

/// Registers the Ctrl-C listener and spawns the bridge task.
#[cfg(not(unix))]
pub fn install(slot: Arc<SignalSlot>, bus: Bus) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            slot.raise(Signal::Interrupt);
            bus.publish(Event::new(EventKind::SignalReceived).with_signal(Signal::Interrupt));
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_ids_round_trip() {
        assert_eq!(Signal::from_id(Signal::Interrupt.id()), Some(Signal::Interrupt));
        assert_eq!(Signal::from_id(Signal::Terminate.id()), Some(Signal::Terminate));
        assert_eq!(Signal::from_id(9), None);
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
    }

    #[test]
    fn test_slot_starts_empty_and_last_signal_wins() {
        let slot = SignalSlot::new();
        assert!(!slot.is_raised());
        assert_eq!(slot.get(), None);

        slot.raise(Signal::Terminate);
        assert_eq!(slot.get(), Some(Signal::Terminate));

        slot.raise(Signal::Interrupt);
        assert_eq!(slot.get(), Some(Signal::Interrupt));
    }
}
