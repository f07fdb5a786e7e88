//! # Worker: one supervised task body.
//!
//! A [`Worker`] owns a task body, the handle of its current run, and the
//! per-run control state (stop request and last result).
//!
//! ## Lifecycle
//! ```text
//! Worker::new ──► start() ──► tokio::spawn(body.run(ctx))
//!                   │                 │
//!                   │                 ├─ Ok(())         → WorkerStopped{code = last result}
//!                   │                 ├─ Err(TaskError) → WorkerStopped{code = err.code()}
//!                   │                 └─ panic          → WorkerPanicked{code = TaskError::FATAL_CODE}
//!                   ▼
//!        is_running() polled by the control loop
//!        request_stop(sig) written once by the control loop
//! ```
//!
//! ## Rules
//! - At most one run at a time: `start()` refuses while the current run is alive.
//! - A finished run's handle is dropped by the next `start()` or by [`Worker::reap`].
//! - Every run gets a fresh stop request; within a run it is written at most once.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::core::Signal;
use crate::error::{TaskError, WorkerError};
use crate::events::{Bus, Event, EventKind};
use crate::logger::Logger;
use crate::subscribers::panic_message;
use crate::tasks::{RunState, SUCCESS, TaskRef, WorkerContext};

/// Config key holding the numeric log level of workers.
pub const WORKER_LOG_KEY: &str = "logging_level_worker";

/// A named background task under supervision.
pub struct Worker {
    name: Arc<str>,
    task: Option<TaskRef>,
    handle: Option<JoinHandle<()>>,
    run: Arc<RunState>,
    config: Arc<Config>,
    log: Logger,
    bus: Option<Bus>,
}

impl Worker {
    /// Creates a worker.
    ///
    /// `task` may be `None` and assigned later with [`Worker::set_task`];
    /// until then the worker cannot be started.
    pub fn new(
        name: impl Into<Arc<str>>,
        task: Option<TaskRef>,
        config: Arc<Config>,
    ) -> Result<Self, WorkerError> {
        let name: Arc<str> = name.into();
        if name.is_empty() {
            return Err(WorkerError::EmptyName);
        }
        let log = Logger::from_config(Arc::clone(&name), &config, WORKER_LOG_KEY);
        if task.is_none() {
            log.warn("The task body is not set !");
        }
        Ok(Self {
            name,
            task,
            handle: None,
            run: Arc::new(RunState::new()),
            config,
            log,
            bus: None,
        })
    }

    /// Worker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigns (or replaces) the task body used by the next start.
    pub fn set_task(&mut self, task: TaskRef) {
        self.task = Some(task);
    }

    /// Routes this worker's lifecycle events to `bus`.
    pub(crate) fn attach_bus(&mut self, bus: Bus) {
        self.bus = Some(bus);
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev);
        }
    }

    /// Starts the task body on a new tokio task.
    ///
    /// Returns `false` (and logs why) if a run is still alive, no task body is
    /// set, or there is no tokio runtime to spawn on.
    pub fn start(&mut self) -> bool {
        self.try_start().is_ok()
    }

    /// Same as [`Worker::start`], returning the refusal reason.
    pub fn try_start(&mut self) -> Result<(), WorkerError> {
        self.log.debug("Checking to prepare the task launch...");

        if let Some(handle) = &self.handle {
            if !handle.is_finished() {
                self.log.warn("A task is already running on this worker !");
                return Err(self.refuse(WorkerError::AlreadyRunning {
                    name: self.name.to_string(),
                }));
            }
            self.log
                .debug("A task has finished running, cleaning up its handle !");
            self.handle = None;
        }

        let Some(task) = self.task.clone() else {
            self.log.error("Unable to start the task body ! (not set)");
            return Err(self.refuse(WorkerError::MissingTask {
                name: self.name.to_string(),
            }));
        };

        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            self.log.error("Unable to start the task body ! (no runtime)");
            return Err(self.refuse(WorkerError::NoRuntime {
                name: self.name.to_string(),
            }));
        };

        let run = Arc::new(RunState::new());
        let task_log = Logger::from_config(
            Arc::clone(&self.name),
            &self.config,
            task.log_level_key(),
        );
        let ctx = WorkerContext::new(
            Arc::clone(&self.name),
            Arc::clone(&run),
            Arc::clone(&self.config),
            task_log,
        );

        self.log.debug("Starting task...");
        self.publish(Event::new(EventKind::WorkerStarting).with_worker(Arc::clone(&self.name)));
        self.run = Arc::clone(&run);
        self.handle = Some(rt.spawn(drive(
            task,
            ctx,
            run,
            Arc::clone(&self.name),
            self.log.clone(),
            self.bus.clone(),
        )));
        Ok(())
    }

    fn refuse(&self, err: WorkerError) -> WorkerError {
        self.publish(
            Event::new(EventKind::WorkerStartRefused)
                .with_worker(Arc::clone(&self.name))
                .with_reason(err.to_string()),
        );
        err
    }

    /// Returns true while a run is in progress. Never blocks.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Returns true if a run handle is held (running, or finished but not yet reaped).
    #[inline]
    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Drops the handle of a finished run. Returns true if one was dropped.
    pub fn reap(&mut self) -> bool {
        if self.handle.as_ref().is_some_and(|h| h.is_finished()) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    /// Writes `signal` as the current run's stop request.
    ///
    /// Returns `false` if a stop was already requested for this run.
    pub fn request_stop(&self, signal: Signal) -> bool {
        let stored = self.run.stop.request(signal);
        if stored {
            self.publish(
                Event::new(EventKind::StopRequested)
                    .with_worker(Arc::clone(&self.name))
                    .with_signal(signal),
            );
        }
        stored
    }

    /// Current run's stop request, `None` while at the sentinel.
    pub fn stop_request(&self) -> Option<Signal> {
        self.run.stop.get()
    }

    /// Result code recorded by the current (or last) run.
    pub fn last_result(&self) -> i32 {
        self.run.last_result()
    }
}

/// Runs one task body to completion and reports how it ended.
async fn drive(
    task: TaskRef,
    ctx: WorkerContext,
    run: Arc<RunState>,
    name: Arc<str>,
    log: Logger,
    bus: Option<Bus>,
) {
    let outcome = std::panic::AssertUnwindSafe(task.run(ctx))
        .catch_unwind()
        .await;

    let ev = match outcome {
        Ok(Ok(())) => Event::new(EventKind::WorkerStopped).with_code(run.last_result()),
        Ok(Err(err)) => {
            record_failure(&run, err.code());
            log.warn(format!("Task body failed: {err}"));
            Event::new(EventKind::WorkerStopped)
                .with_code(run.last_result())
                .with_reason(err.to_string())
        }
        Err(payload) => {
            record_failure(&run, TaskError::FATAL_CODE);
            let msg = panic_message(payload.as_ref());
            log.error(format!("Task body panicked: {msg}"));
            Event::new(EventKind::WorkerPanicked)
                .with_code(run.last_result())
                .with_reason(msg)
        }
    };
    if let Some(bus) = bus {
        bus.publish(ev.with_worker(name));
    }
}

/// Stores `code` unless the body already recorded a non-zero result.
fn record_failure(run: &RunState, code: i32) {
    let _ = run
        .last_result
        .compare_exchange(SUCCESS, code, Ordering::AcqRel, Ordering::Acquire);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use std::time::Duration;

    fn config() -> Arc<Config> {
        Arc::new(Config::empty())
    }

    fn until_stopped() -> TaskRef {
        TaskFn::arc(|ctx: WorkerContext| async move {
            while ctx.stop_requested().is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            ctx.set_last_result(7);
            Ok::<_, TaskError>(())
        })
    }

    async fn wait_stopped(w: &Worker) {
        while w.is_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            Worker::new("", None, config()).err(),
            Some(WorkerError::EmptyName)
        );
    }

    #[tokio::test]
    async fn test_not_running_before_start() {
        let w = Worker::new("idle", Some(until_stopped()), config()).unwrap();
        assert!(!w.is_running());
        assert!(!w.has_handle());
        assert_eq!(w.stop_request(), None);
        assert_eq!(w.last_result(), 0);
    }

    #[tokio::test]
    async fn test_start_without_task_is_refused() {
        let mut w = Worker::new("empty", None, config()).unwrap();
        assert!(!w.start());
        assert!(!w.has_handle());
        assert!(matches!(
            w.try_start(),
            Err(WorkerError::MissingTask { .. })
        ));
    }

    #[test]
    fn test_start_without_runtime_is_refused() {
        let mut w = Worker::new("no-rt", Some(until_stopped()), config()).unwrap();
        assert!(matches!(w.try_start(), Err(WorkerError::NoRuntime { .. })));
        assert!(!w.has_handle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_refused_while_running() {
        let mut w = Worker::new("busy", Some(until_stopped()), config()).unwrap();
        assert!(w.start());
        assert!(w.is_running());

        assert!(matches!(
            w.try_start(),
            Err(WorkerError::AlreadyRunning { .. })
        ));
        assert!(w.is_running());

        assert!(w.request_stop(Signal::Terminate));
        wait_stopped(&w).await;
        assert_eq!(w.last_result(), 7);
        assert_eq!(w.stop_request(), Some(Signal::Terminate));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_request_written_once() {
        let mut w = Worker::new("once", Some(until_stopped()), config()).unwrap();
        assert!(w.start());
        assert!(w.request_stop(Signal::Interrupt));
        assert!(!w.request_stop(Signal::Terminate));
        assert_eq!(w.stop_request(), Some(Signal::Interrupt));
        wait_stopped(&w).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_finish_gets_fresh_state() {
        let mut w = Worker::new("again", Some(until_stopped()), config()).unwrap();
        assert!(w.start());
        w.request_stop(Signal::Interrupt);
        wait_stopped(&w).await;
        assert!(w.has_handle());

        assert!(w.start());
        assert!(w.is_running());
        assert_eq!(w.stop_request(), None);
        assert_eq!(w.last_result(), 0);

        w.request_stop(Signal::Interrupt);
        wait_stopped(&w).await;
        assert!(w.reap());
        assert!(!w.has_handle());
        assert!(!w.reap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_code_recorded() {
        let failing: TaskRef = TaskFn::arc(|_ctx: WorkerContext| async move {
            Err::<(), _>(TaskError::Fail {
                code: 42,
                error: "boom".into(),
            })
        });
        let mut w = Worker::new("failing", Some(failing), config()).unwrap();
        assert!(w.start());
        wait_stopped(&w).await;
        assert_eq!(w.last_result(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_body_reported() {
        let panicking: TaskRef = TaskFn::arc(|_ctx: WorkerContext| async move {
            if true {
                panic!("body exploded");
            }
            Ok::<_, TaskError>(())
        });
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let mut w = Worker::new("panicking", Some(panicking), config()).unwrap();
        w.attach_bus(bus);

        assert!(w.start());
        wait_stopped(&w).await;

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::WorkerStarting);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::WorkerPanicked);
        assert_eq!(ev.reason.as_deref(), Some("body exploded"));
        assert_eq!(ev.code, Some(TaskError::FATAL_CODE));
        assert_eq!(w.last_result(), TaskError::FATAL_CODE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_keeps_code_set_by_body() {
        let body: TaskRef = TaskFn::arc(|ctx: WorkerContext| async move {
            ctx.set_last_result(5);
            if true {
                panic!("after setting a result");
            }
            Ok::<_, TaskError>(())
        });
        let mut w = Worker::new("partial", Some(body), config()).unwrap();
        assert!(w.start());
        wait_stopped(&w).await;
        assert_eq!(w.last_result(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_sees_signal_written_by_worker() {
        let body: TaskRef = TaskFn::arc(|ctx: WorkerContext| async move {
            let sig = ctx.stopped().await;
            ctx.set_last_result(sig.id());
            Ok::<_, TaskError>(())
        });
        let mut w = Worker::new("observer", Some(body), config()).unwrap();
        assert!(w.start());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(w.is_running());

        assert!(w.request_stop(Signal::Interrupt));
        wait_stopped(&w).await;
        assert_eq!(w.stop_request(), Some(Signal::Interrupt));
        assert_eq!(w.last_result(), Signal::Interrupt.id());
    }
}
