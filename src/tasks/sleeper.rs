//! # Counted-sleep example body.
//!
//! [`CountedSleep`] simulates a job made of `sleep_count` fixed-length steps.
//! Between steps it pauses for [`CHECKPOINT`] and checks the stop request, so
//! a stop is observed within one step length plus one checkpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::core::Worker;
use crate::error::{TaskError, WorkerError};
use crate::tasks::context::WorkerContext;
use crate::tasks::task::Task;

/// Pause between two stop-request checks.
pub const CHECKPOINT: Duration = Duration::from_millis(10);

/// Config key for the body's numeric log level.
pub const LOG_LEVEL_KEY: &str = "logging_level_task_example";

/// Sleeps `sleep_count` times for `sleep_length`, then returns.
#[derive(Debug, Clone, Copy)]
pub struct CountedSleep {
    /// Number of steps before the body finishes on its own.
    pub sleep_count: u32,
    /// Duration of one step.
    pub sleep_length: Duration,
}

impl CountedSleep {
    pub fn new(sleep_count: u32, sleep_length: Duration) -> Self {
        Self {
            sleep_count,
            sleep_length,
        }
    }
}

#[async_trait]
impl Task for CountedSleep {
    async fn run(&self, ctx: WorkerContext) -> Result<(), TaskError> {
        let log = ctx.log();
        log.debug("Started task !");

        let mut remaining = self.sleep_count;
        while ctx.stop_requested().is_none() {
            tokio::time::sleep(CHECKPOINT).await;

            if remaining == 0 {
                log.debug("Time to wake up !");
                break;
            }
            log.debug("Mimimimimimimi...");
            tokio::time::sleep(self.sleep_length).await;
            remaining -= 1;
        }

        log.debug(format!("Closing task ! => {}", ctx.last_result()));
        Ok(())
    }

    fn log_level_key(&self) -> &str {
        LOG_LEVEL_KEY
    }
}

/// Builds the example worker named `example-worker-<suffix>`.
///
/// An empty suffix yields `example-worker`.
pub fn example_worker(
    config: Arc<Config>,
    suffix: &str,
    sleep_length: Duration,
    sleep_count: u32,
) -> Result<Worker, WorkerError> {
    let name = format!("example-worker-{suffix}");
    let name = name.trim_end_matches('-');
    Worker::new(
        name,
        Some(Arc::new(CountedSleep::new(sleep_count, sleep_length))),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Signal;
    use crate::logger::Logger;
    use crate::tasks::RunState;

    #[tokio::test(start_paused = true)]
    async fn test_finishes_after_all_steps() {
        let ctx = WorkerContext::detached("sleeper", Arc::new(Config::empty()));
        let body = CountedSleep::new(3, Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        body.run(ctx.clone()).await.unwrap();

        // 3 steps of 100ms plus 4 checkpoints of 10ms.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(340), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(360), "{elapsed:?}");
        assert_eq!(ctx.last_result(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_immediately_when_stop_already_requested() {
        let run = Arc::new(RunState::new());
        assert!(run.stop.request(Signal::Terminate));
        let ctx = WorkerContext::new(
            "sleeper".into(),
            run,
            Arc::new(Config::empty()),
            Logger::new("sleeper", tracing::Level::INFO),
        );

        let started = tokio::time::Instant::now();
        CountedSleep::new(100, Duration::from_secs(1))
            .run(ctx)
            .await
            .unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_example_worker_names() {
        let cfg = Arc::new(Config::empty());
        let w = example_worker(cfg.clone(), "demo", Duration::from_millis(750), 5).unwrap();
        assert_eq!(w.name(), "example-worker-demo");

        let w = example_worker(cfg, "", Duration::from_millis(750), 5).unwrap();
        assert_eq!(w.name(), "example-worker");
    }
}
