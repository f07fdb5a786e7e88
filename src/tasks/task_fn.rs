//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(WorkerContext) -> Fut`, producing a fresh
//! future per start. State shared between runs must be put behind an `Arc`
//! inside the closure explicitly.
//!
//! ## Example
//! ```rust
//! use workvisor::{TaskError, TaskFn, TaskRef, WorkerContext};
//!
//! let t: TaskRef = TaskFn::arc(|ctx: WorkerContext| async move {
//!     let signal = ctx.stopped().await;
//!     ctx.log().info(format!("stopping on {signal}"));
//!     Ok::<_, TaskError>(())
//! });
//! assert_eq!(t.log_level_key(), "logging_level_task");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::WorkerContext;
use crate::tasks::task::{DEFAULT_TASK_LOG_KEY, Task};

/// Function-backed task implementation.
pub struct TaskFn<F> {
    f: F,
    log_key: Cow<'static, str>,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    pub fn new(f: F) -> Self {
        Self {
            f,
            log_key: Cow::Borrowed(DEFAULT_TASK_LOG_KEY),
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }

    /// Reads the body's log level from `key` instead of the default key.
    pub fn with_log_level_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.log_key = key.into();
        self
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(WorkerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn run(&self, ctx: WorkerContext) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }

    fn log_level_key(&self) -> &str {
        &self.log_key
    }
}
