//! # Task bodies and their view of the owning worker.
//!
//! - [`Task`] - trait every task body implements
//! - [`TaskFn`] - closure-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`WorkerContext`] - what a running body may see and write
//! - [`StopRequest`] - write-once advisory stop value
//! - [`CountedSleep`] - the example body shipped with the binary

mod context;
mod sleeper;
mod stop;
mod task;
mod task_fn;

pub(crate) use context::RunState;
pub use context::{SUCCESS, WorkerContext};
pub use sleeper::{CountedSleep, example_worker};
pub use stop::{NO_REQUEST, StopRequest};
pub use task::{DEFAULT_TASK_LOG_KEY, Task, TaskRef};
pub use task_fn::TaskFn;
