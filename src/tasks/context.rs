//! # Worker context handed to task bodies.
//!
//! A [`WorkerContext`] is the task body's view of its owning worker:
//! it may read the stop request and the shared config, log through its own
//! named logger, and record the result code. It cannot write the stop request.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::Signal;
use crate::logger::Logger;
use crate::tasks::stop::StopRequest;
use crate::tasks::task::DEFAULT_TASK_LOG_KEY;

/// Result code a run reports unless its body sets another one.
pub const SUCCESS: i32 = 0;

/// State of one run, shared between the worker and its task body.
#[derive(Debug)]
pub(crate) struct RunState {
    pub(crate) stop: StopRequest,
    pub(crate) last_result: AtomicI32,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            stop: StopRequest::new(),
            last_result: AtomicI32::new(SUCCESS),
        }
    }

    pub(crate) fn last_result(&self) -> i32 {
        self.last_result.load(Ordering::Acquire)
    }
}

/// Task body's handle on its worker.
///
/// Cheap to clone.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    name: Arc<str>,
    run: Arc<RunState>,
    config: Arc<Config>,
    log: Logger,
}

impl WorkerContext {
    pub(crate) fn new(name: Arc<str>, run: Arc<RunState>, config: Arc<Config>, log: Logger) -> Self {
        Self {
            name,
            run,
            config,
            log,
        }
    }

    /// Creates a context that is not attached to any worker.
    ///
    /// Useful for driving a task body directly in tests.
    pub fn detached(name: impl Into<Arc<str>>, config: Arc<Config>) -> Self {
        let name = name.into();
        let log = Logger::from_config(Arc::clone(&name), &config, DEFAULT_TASK_LOG_KEY);
        Self::new(name, Arc::new(RunState::new()), config, log)
    }

    /// Name of the owning worker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signal of the stop request, or `None` while no stop was requested.
    ///
    /// This is the checkpoint task bodies must poll at bounded intervals.
    #[inline]
    pub fn stop_requested(&self) -> Option<Signal> {
        self.run.stop.get()
    }

    /// Returns true once a stop was requested.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.run.stop.is_requested()
    }

    /// Completes when a stop is requested.
    pub async fn stopped(&self) -> Signal {
        self.run.stop.requested().await
    }

    /// Token cancelled when a stop is requested.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.run.stop.token()
    }

    /// Records the result code reported when the body finishes.
    pub fn set_last_result(&self, code: i32) {
        self.run.last_result.store(code, Ordering::Release);
    }

    /// Currently recorded result code.
    pub fn last_result(&self) -> i32 {
        self.run.last_result()
    }

    /// Shared read-only configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Task body's logger.
    pub fn log(&self) -> &Logger {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing::Level;

    fn attached(config: Config) -> (Arc<RunState>, WorkerContext) {
        let run = Arc::new(RunState::new());
        let config = Arc::new(config);
        let log = Logger::from_config("ctx", &config, DEFAULT_TASK_LOG_KEY);
        let ctx = WorkerContext::new("ctx".into(), Arc::clone(&run), config, log);
        (run, ctx)
    }

    #[test]
    fn test_stop_written_by_run_state_is_visible() {
        let (run, ctx) = attached(Config::empty());
        assert!(!ctx.should_stop());
        assert_eq!(ctx.stop_requested(), None);

        assert!(run.stop.request(Signal::Terminate));
        assert!(ctx.should_stop());
        assert_eq!(ctx.stop_requested(), Some(Signal::Terminate));
        assert!(ctx.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_last_result_shared_with_run_state() {
        let (run, ctx) = attached(Config::empty());
        ctx.set_last_result(9);
        assert_eq!(run.last_result(), 9);
        assert_eq!(ctx.last_result(), 9);
    }

    #[test]
    fn test_detached_reads_default_task_level() {
        let config = Config::from_value(json!({ "logging_level_task": 10 })).unwrap();
        let ctx = WorkerContext::detached("detached", Arc::new(config));
        assert_eq!(ctx.name(), "detached");
        assert!(ctx.log().enabled(Level::DEBUG));

        let quiet = WorkerContext::detached("quiet", Arc::new(Config::empty()));
        assert!(!quiet.log().enabled(Level::DEBUG));
    }
}
