//! # workvisor
//!
//! **Workvisor** is a minimal in-process supervisor for a small, fixed set of
//! long-running background workers.
//!
//! It spawns each worker's task body on its own tokio task, notices when any
//! of them stops, turns SIGINT/SIGTERM into a cooperative shutdown, and waits
//! for every worker to finish before returning.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Worker    │   │    Worker    │   │    Worker    │
//!     │ (task body A)│   │ (task body B)│   │ (task body C)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (control loop)                                        │
//! │  - starts workers in registration order                           │
//! │  - every tick: SignalSlot set? any worker not running?            │
//! │  - on either: stop request to every worker, wait until all stop   │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ publishes                                        ▲ polls
//!        ▼                                                  │
//! ┌──────────────┐      ┌───────────────┐         ┌─────────┴────────┐
//! │     Bus      │ ───► │ SubscriberSet │         │    SignalSlot    │
//! │ (broadcast)  │      │ (LogWriter..) │         │   (AtomicI32)    │
//! └──────────────┘      └───────────────┘         └─────────▲────────┘
//!                                                           │ raise
//!                                                  SIGINT / SIGTERM listener
//! ```
//!
//! ### Shutdown policy
//! ```text
//! signal received          ─┐
//!                           ├─► stop request(sig) to ALL workers ─► wait until none runs
//! any worker not running   ─┘   (worker exit uses SIGINT)
//! ```
//! A worker that finishes successfully is treated exactly like one that
//! crashed: every other worker is asked to stop.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                      |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Workers**       | Start, poll and stop one task body.                      | [`Worker`], [`StopRequest`]             |
//! | **Task bodies**   | Cooperative units of work.                               | [`Task`], [`TaskFn`], [`WorkerContext`] |
//! | **Supervision**   | Control loop and coordinated shutdown.                   | [`Supervisor`], [`SupervisorConfig`]    |
//! | **Signals**       | Atomic bridge from OS signals to the loop.               | [`Signal`], [`SignalSlot`]              |
//! | **Events**        | Lifecycle events and subscribers.                        | [`Event`], [`Subscribe`]                |
//! | **Configuration** | Shared read-only key/value config.                       | [`Config`]                              |
//! | **Errors**        | Typed errors and process exit codes.                     | [`RuntimeError`], [`ExitCode`]          |
//!
//! ## Optional features
//! - `logging` (default): exports the [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use workvisor::{Config, Supervisor, SupervisorConfig, TaskError, TaskFn, Worker, WorkerContext};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::empty());
//!
//!     // Finishes on its own after 50ms, which shuts the other worker down.
//!     let short = TaskFn::arc(|_ctx: WorkerContext| async move {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         Ok::<_, TaskError>(())
//!     });
//!     let forever = TaskFn::arc(|ctx: WorkerContext| async move {
//!         while ctx.stop_requested().is_none() {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!         }
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     let cfg = SupervisorConfig {
//!         tick: Duration::from_millis(20),
//!         install_signal_handlers: false,
//!         ..SupervisorConfig::default()
//!     };
//!     let report = Supervisor::builder(cfg)
//!         .with_worker(Worker::new("short", Some(short), config.clone())?)
//!         .with_worker(Worker::new("forever", Some(forever), config)?)
//!         .build()
//!         .run()
//!         .await?;
//!
//!     assert_eq!(report.results.len(), 2);
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod exit;
pub mod logger;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{
    MAIN_UNIT, ShutdownCause, ShutdownReport, Signal, SignalSlot, Supervisor, SupervisorBuilder,
    SupervisorConfig, WORKER_LOG_KEY, Worker,
};
pub use error::{ConfigError, RuntimeError, TaskError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use exit::ExitCode;
pub use logger::Logger;
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    CountedSleep, DEFAULT_TASK_LOG_KEY, NO_REQUEST, SUCCESS, StopRequest, Task, TaskFn, TaskRef,
    WorkerContext, example_worker,
};

// Built-in logging subscriber.
// Disable with: `--no-default-features`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
