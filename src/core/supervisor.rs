//! # Supervisor: the control loop.
//!
//! The [`Supervisor`] owns the workers, starts them in registration order,
//! polls their liveness and the [`SignalSlot`] on a fixed tick, and drives a
//! coordinated shutdown.
//!
//! ## High-level flow
//! ```text
//! run():
//!   signals::install(slot)                      (if enabled)
//!   subscriber listener: Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   Worker[0].start() ... Worker[N-1].start()   (failures logged, run continues)
//!
//!   loop every `tick`:
//!     ├─ slot.get() == Some(sig)          ─► cause = Signal(sig)
//!     └─ any worker !is_running()          ─► cause = WorkerExited(name), sig = SIGINT
//!
//!   ShutdownRequested{sig}
//!   Worker[i].request_stop(sig)  for every worker
//!   loop every `shutdown_poll` until no worker is running
//!     └─ (optional) shutdown_deadline ─► RuntimeError::DeadlineExceeded
//!   AllStopped ─► ShutdownReport
//! ```
//!
//! ## Rules
//! - Any worker leaving the running state triggers shutdown of all of them,
//!   whether it crashed, failed, never started, or completed successfully.
//! - Stop requests are advisory; the loop waits for bodies to notice them.
//! - The loop polls; it is never woken by worker completion or signal delivery.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::Worker;
use crate::core::config::SupervisorConfig;
use crate::core::signals::{self, Signal, SignalSlot};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::logger::Logger;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Why the control loop left its polling phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownCause {
    /// An OS termination signal was recorded.
    Signal(Signal),
    /// The named worker was observed not running.
    WorkerExited(String),
}

impl ShutdownCause {
    /// Signal identifier assigned to every worker's stop request.
    pub fn signal(&self) -> Signal {
        match self {
            ShutdownCause::Signal(sig) => *sig,
            ShutdownCause::WorkerExited(_) => Signal::Interrupt,
        }
    }
}

/// Outcome of a completed supervisor run.
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    /// What triggered the shutdown.
    pub cause: ShutdownCause,
    /// Names of workers that refused to start.
    pub failed_to_start: Vec<String>,
    /// `(name, last result)` per worker, in registration order.
    pub results: Vec<(String, i32)>,
}

impl ShutdownReport {
    /// Signal identifier written to the workers.
    pub fn signal(&self) -> Signal {
        self.cause.signal()
    }
}

/// Coordinates workers, signal observation and coordinated shutdown.
pub struct Supervisor {
    cfg: SupervisorConfig,
    workers: Vec<Worker>,
    signals: Arc<SignalSlot>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    log: Logger,
}

impl Supervisor {
    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        workers: Vec<Worker>,
        signals: Arc<SignalSlot>,
        bus: Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
        log: Logger,
    ) -> Self {
        Self {
            cfg,
            workers,
            signals,
            bus,
            subscribers,
            log,
        }
    }

    /// Slot the signal bridge writes to.
    ///
    /// Raising a signal on it has the same effect as delivering that signal
    /// to the process.
    pub fn signal_slot(&self) -> Arc<SignalSlot> {
        Arc::clone(&self.signals)
    }

    /// Event bus shared with the workers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registered workers, in registration order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Runs the start / poll / shutdown sequence until every worker stopped.
    pub async fn run(mut self) -> Result<ShutdownReport, RuntimeError> {
        let bridge = if self.cfg.install_signal_handlers {
            self.log.info("Registering signal handlers...");
            Some(
                signals::install(Arc::clone(&self.signals), self.bus.clone())
                    .map_err(RuntimeError::SignalSetup)?,
            )
        } else {
            None
        };

        let done = CancellationToken::new();
        let listener = self.subscriber_listener(done.clone());

        let failed_to_start = self.start_workers();

        self.log.info("Entering main loop...");
        let cause = self.poll_until_shutdown().await;
        let signal = cause.signal();

        self.log.info("Exiting main loop...");
        let mut requested = Event::new(EventKind::ShutdownRequested).with_signal(signal);
        if let ShutdownCause::WorkerExited(name) = &cause {
            requested = requested.with_worker(name.as_str());
        }
        self.bus.publish(requested);

        for worker in &self.workers {
            worker.request_stop(signal);
        }
        let waited = self.wait_all_stopped().await;
        for worker in &mut self.workers {
            worker.reap();
        }

        if let Some(bridge) = bridge {
            bridge.abort();
        }
        if waited.is_ok() {
            self.bus.publish(Event::new(EventKind::AllStopped));
        }
        done.cancel();
        if let Some(listener) = listener {
            let _ = listener.await;
        }

        waited.map(|()| ShutdownReport {
            cause,
            failed_to_start,
            results: self
                .workers
                .iter()
                .map(|w| (w.name().to_string(), w.last_result()))
                .collect(),
        })
    }

    /// Starts every worker in registration order; returns the names that refused.
    fn start_workers(&mut self) -> Vec<String> {
        self.log.info("Starting workers...");
        let mut failed = Vec::new();
        for worker in &mut self.workers {
            if let Err(err) = worker.try_start() {
                self.log
                    .error(format!("Worker `{}` failed to start: {err}", worker.name()));
                failed.push(worker.name().to_string());
            }
        }
        failed
    }

    /// Ticks until a signal is recorded or a worker is found not running.
    async fn poll_until_shutdown(&self) -> ShutdownCause {
        let tick = self.cfg.tick_clamped();
        loop {
            if let Some(sig) = self.signals.get() {
                self.log.info(format!("{sig} received !"));
                return ShutdownCause::Signal(sig);
            }
            if let Some(dead) = self.workers.iter().find(|w| !w.is_running()) {
                self.log.debug(
                    "Found some non-running workers, preparing the exit variables...",
                );
                self.bus
                    .publish(Event::new(EventKind::WorkerExited).with_worker(dead.name()));
                return ShutdownCause::WorkerExited(dead.name().to_string());
            }
            tokio::time::sleep(tick).await;
        }
    }

    /// Polls until no worker is running, bounded by the optional deadline.
    async fn wait_all_stopped(&self) -> Result<(), RuntimeError> {
        let poll = self.cfg.shutdown_poll_clamped();
        let all_stopped = async {
            while self.workers.iter().any(Worker::is_running) {
                tokio::time::sleep(poll).await;
            }
        };

        let Some(deadline) = self.cfg.shutdown_deadline else {
            all_stopped.await;
            return Ok(());
        };
        if tokio::time::timeout(deadline, all_stopped).await.is_ok() {
            return Ok(());
        }

        let stuck: Vec<String> = self
            .workers
            .iter()
            .filter(|w| w.is_running())
            .map(|w| w.name().to_string())
            .collect();
        self.log
            .error(format!("Workers still running after {deadline:?}: {stuck:?}"));
        self.bus
            .publish(Event::new(EventKind::DeadlineExceeded).with_reason(stuck.join(",")));
        Err(RuntimeError::DeadlineExceeded { deadline, stuck })
    }

    /// Forwards bus events to the subscribers until `done` is cancelled.
    ///
    /// Returns `None` when there are no subscribers.
    fn subscriber_listener(&mut self, done: CancellationToken) -> Option<JoinHandle<()>> {
        if self.subscribers.is_empty() {
            return None;
        }
        let set = SubscriberSet::new(std::mem::take(&mut self.subscribers), self.bus.clone());
        let mut rx = self.bus.subscribe();

        Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                    _ = done.cancelled() => {
                        while let Ok(ev) = rx.try_recv() {
                            set.emit(&ev);
                        }
                        break;
                    }
                }
            }
            set.shutdown().await;
        }))
    }
}
