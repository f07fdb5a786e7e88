//! # Task body contract.
//!
//! A [`Task`] is the unit of work a [`Worker`](crate::Worker) runs on its own
//! tokio task. The body receives the [`WorkerContext`] of its worker and must:
//!
//! - check [`WorkerContext::stop_requested`] (or await [`WorkerContext::stopped`])
//!   at bounded intervals, ideally well under one supervisor tick,
//! - return promptly once a stop is requested,
//! - record its result with [`WorkerContext::set_last_result`] before returning
//!   (or return a [`TaskError`], whose code is recorded instead).
//!
//! The supervisor cannot kill a body. A body that never checks the stop
//! request blocks shutdown forever (unless a shutdown deadline is configured).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::WorkerContext;

/// Config key holding the default numeric log level of task bodies.
pub const DEFAULT_TASK_LOG_KEY: &str = "logging_level_task";

/// # Asynchronous, cooperatively stoppable unit of work.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use std::time::Duration;
/// use workvisor::{Task, TaskError, WorkerContext};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Task for Ticker {
///     async fn run(&self, ctx: WorkerContext) -> Result<(), TaskError> {
///         while ctx.stop_requested().is_none() {
///             tokio::time::sleep(Duration::from_millis(10)).await;
///         }
///         ctx.set_last_result(0);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Runs the body until it completes or observes a stop request.
    async fn run(&self, ctx: WorkerContext) -> Result<(), TaskError>;

    /// Config key holding this body's numeric log level.
    fn log_level_key(&self) -> &str {
        DEFAULT_TASK_LOG_KEY
    }
}

/// Shared handle to a task body.
pub type TaskRef = Arc<dyn Task>;
