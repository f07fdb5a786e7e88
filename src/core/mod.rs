//! Runtime core: workers, the control loop and the signal bridge.
//!
//! Internal modules:
//! - `worker`: one supervised task body and its run handle;
//! - `supervisor`: starts workers, polls liveness, drives coordinated shutdown;
//! - `signals`: records SIGINT/SIGTERM in an atomic slot the loop polls;
//! - `config`: cadences and deadline of the control loop;
//! - `builder`: assembles a [`Supervisor`].

mod builder;
mod config;
mod signals;
mod supervisor;
mod worker;

pub use builder::{MAIN_UNIT, SupervisorBuilder};
pub use config::SupervisorConfig;
pub use signals::{Signal, SignalSlot};
pub use supervisor::{ShutdownCause, ShutdownReport, Supervisor};
pub use worker::{WORKER_LOG_KEY, Worker};
