use std::sync::Arc;

use crate::core::Worker;
use crate::core::config::SupervisorConfig;
use crate::core::signals::SignalSlot;
use crate::events::Bus;
use crate::logger::Logger;
use crate::subscribers::Subscribe;

use super::supervisor::Supervisor;

/// Unit name of the control loop's logger.
pub const MAIN_UNIT: &str = "main";

/// Builder for a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    workers: Vec<Worker>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    signals: Option<Arc<SignalSlot>>,
    log: Option<Logger>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            workers: Vec::new(),
            subscribers: Vec::new(),
            signals: None,
            log: None,
        }
    }

    /// Registers a worker. Workers start in registration order.
    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    /// Registers several workers, keeping their order.
    pub fn with_workers(mut self, workers: impl IntoIterator<Item = Worker>) -> Self {
        self.workers.extend(workers);
        self
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber receives runtime events through its own bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Shares an existing signal slot instead of creating a fresh one.
    pub fn with_signal_slot(mut self, slot: Arc<SignalSlot>) -> Self {
        self.signals = Some(slot);
        self
    }

    /// Sets the control loop's logger (default: unit `main` at info level).
    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    /// Builds the supervisor and attaches every worker to its event bus.
    pub fn build(self) -> Supervisor {
        let bus = Bus::new(self.cfg.bus_capacity);
        let mut workers = self.workers;
        for worker in &mut workers {
            worker.attach_bus(bus.clone());
        }
        let log = self
            .log
            .unwrap_or_else(|| Logger::new(MAIN_UNIT, tracing::Level::INFO));

        Supervisor::new_internal(
            self.cfg,
            workers,
            self.signals.unwrap_or_default(),
            bus,
            self.subscribers,
            log,
        )
    }
}

impl Supervisor {
    /// Returns a builder for a supervisor with the given settings.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }
}
