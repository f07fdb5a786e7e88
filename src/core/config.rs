//! # Control loop settings.
//!
//! [`SupervisorConfig`] holds the cadences of the two polling phases and the
//! optional shutdown deadline. It can be built by hand or read from the shared
//! [`Config`] with [`SupervisorConfig::from_config`].
//!
//! ## Sentinel values
//! - `shutdown_deadline = None` → wait for workers forever
//! - `supervisor_shutdown_deadline_ms = 0` (or absent) → `None`

use std::time::Duration;

use crate::config::Config;

/// Settings of the supervising control loop.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Interval between two liveness checks while all workers run.
    pub tick: Duration,

    /// Interval between two checks while waiting for workers to stop.
    pub shutdown_poll: Duration,

    /// Maximum time to wait for workers after stop requests were sent.
    ///
    /// `None` waits indefinitely; a worker that ignores its stop request then
    /// keeps the process alive.
    pub shutdown_deadline: Option<Duration>,

    /// Whether `run` registers SIGINT/SIGTERM listeners.
    ///
    /// Embedders that own signal handling (and tests) turn this off and raise
    /// the supervisor's [`SignalSlot`](crate::SignalSlot) themselves.
    pub install_signal_handlers: bool,

    /// Capacity of the event bus ring buffer (min 1).
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Reads the settings from the shared configuration, falling back to
    /// [`SupervisorConfig::default`] per key.
    ///
    /// Keys: `supervisor_tick_ms`, `supervisor_shutdown_poll_ms`,
    /// `supervisor_shutdown_deadline_ms`, `supervisor_bus_capacity`.
    pub fn from_config(config: &Config) -> Self {
        let d = Self::default();
        let ms = |key: &str, default: Duration| {
            let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(config.get(key, default_ms))
        };
        let deadline_ms: u64 = config.get("supervisor_shutdown_deadline_ms", 0);
        Self {
            tick: ms("supervisor_tick_ms", d.tick),
            shutdown_poll: ms("supervisor_shutdown_poll_ms", d.shutdown_poll),
            shutdown_deadline: (deadline_ms > 0).then(|| Duration::from_millis(deadline_ms)),
            install_signal_handlers: d.install_signal_handlers,
            bus_capacity: config.get("supervisor_bus_capacity", d.bus_capacity),
        }
    }

    /// Tick clamped to at least 1ms so the loop never spins.
    #[inline]
    pub fn tick_clamped(&self) -> Duration {
        self.tick.max(Duration::from_millis(1))
    }

    /// Shutdown poll clamped to at least 1ms.
    #[inline]
    pub fn shutdown_poll_clamped(&self) -> Duration {
        self.shutdown_poll.max(Duration::from_millis(1))
    }
}

impl Default for SupervisorConfig {
    /// - `tick = 1s`
    /// - `shutdown_poll = 100ms`
    /// - `shutdown_deadline = None`
    /// - `install_signal_handlers = true`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            shutdown_poll: Duration::from_millis(100),
            shutdown_deadline: None,
            install_signal_handlers: true,
            bus_capacity: 1024,
        }
    }
}
