//! Error types used by the workvisor runtime, its workers and task bodies.
//!
//! - [`RuntimeError`]: failures of the supervising control loop itself.
//! - [`WorkerError`]: a worker refused to be built or started.
//! - [`TaskError`]: a task body finished with a failure.
//! - [`ConfigError`]: the configuration file could not be loaded.
//!
//! Every enum provides `as_label` (stable snake_case string for logs).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by the control loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// OS signal listeners could not be registered.
    #[error("failed to install signal handlers: {0}")]
    SignalSetup(#[source] std::io::Error),

    /// Workers did not stop before the configured shutdown deadline.
    #[error("shutdown deadline {deadline:?} exceeded; stuck: {stuck:?}")]
    DeadlineExceeded {
        /// The configured deadline.
        deadline: Duration,
        /// Names of workers still running when the deadline hit.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use workvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::DeadlineExceeded { deadline: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_deadline_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::SignalSetup(_) => "runtime_signal_setup",
            RuntimeError::DeadlineExceeded { .. } => "runtime_deadline_exceeded",
        }
    }
}

/// # Reasons a worker cannot be built or started.
///
/// These are startup defects: they are logged and reported to the caller,
/// never escalated to a process fault.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Worker names are used as log units and must not be empty.
    #[error("worker name must not be empty")]
    EmptyName,

    /// A run is already in progress on this worker.
    #[error("worker `{name}` is already running")]
    AlreadyRunning {
        /// Worker name.
        name: String,
    },

    /// No task body has been assigned.
    #[error("worker `{name}` has no task body")]
    MissingTask {
        /// Worker name.
        name: String,
    },

    /// `start()` was called outside of a tokio runtime.
    #[error("worker `{name}` cannot start outside a tokio runtime")]
    NoRuntime {
        /// Worker name.
        name: String,
    },
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::EmptyName => "worker_empty_name",
            WorkerError::AlreadyRunning { .. } => "worker_already_running",
            WorkerError::MissingTask { .. } => "worker_missing_task",
            WorkerError::NoRuntime { .. } => "worker_no_runtime",
        }
    }
}

/// # Errors returned by task bodies.
///
/// A failing body still counts as a finished worker; the supervisor treats
/// it like any other exit. The error only determines the recorded result code.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task failed with an explicit result code.
    #[error("execution failed (code {code}): {error}")]
    Fail {
        /// Result code recorded as the worker's last result.
        code: i32,
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable failure without a specific code.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Result code used when a `Fatal` error does not carry one.
    pub const FATAL_CODE: i32 = 1;

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use workvisor::TaskError;
    ///
    /// let err = TaskError::Fail { code: 3, error: "boom".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Fatal { .. } => "task_fatal",
        }
    }

    /// Result code recorded on the worker when the body returns this error.
    ///
    /// Never returns 0 so a failure is distinguishable from success.
    pub fn code(&self) -> i32 {
        match self {
            TaskError::Fail { code, .. } if *code != 0 => *code,
            _ => Self::FATAL_CODE,
        }
    }
}

/// # Errors raised while loading the configuration file.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an object.
    #[error("config file {path} must contain a JSON object")]
    NotAnObject {
        /// File path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "config_io",
            ConfigError::Parse { .. } => "config_parse",
            ConfigError::NotAnObject { .. } => "config_not_an_object",
        }
    }
}
