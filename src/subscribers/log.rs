//! # Logging subscriber.
//!
//! [`LogWriter`] renders runtime events through a [`Logger`] so that lifecycle
//! transitions show up next to the units' own messages.
//!
//! ## Output format
//! ```text
//! [starting] worker=example-worker-demo
//! [stopped] worker=example-worker-demo code=0
//! [exited] worker=example-worker-demo
//! [shutdown-requested] signal=SIGINT
//! [stop-requested] worker=example-worker-demo signal=SIGINT
//! [all-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::logger::Logger;
use crate::subscribers::Subscribe;

/// Subscriber that writes every event to a named logger.
///
/// Enabled via the `logging` feature.
pub struct LogWriter {
    log: Logger,
}

impl LogWriter {
    /// Creates a writer that reports through `log`.
    pub fn new(log: Logger) -> Self {
        Self { log }
    }
}

fn worker(e: &Event) -> &str {
    e.worker.as_deref().unwrap_or("?")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::WorkerStarting => {
                self.log.debug(format!("[starting] worker={}", worker(e)));
            }
            EventKind::WorkerStartRefused => {
                self.log.error(format!(
                    "[start-refused] worker={} reason={:?}",
                    worker(e),
                    e.reason
                ));
            }
            EventKind::WorkerStopped => match &e.reason {
                Some(reason) => self.log.warn(format!(
                    "[stopped] worker={} code={:?} err={reason:?}",
                    worker(e),
                    e.code
                )),
                None => self
                    .log
                    .debug(format!("[stopped] worker={} code={:?}", worker(e), e.code)),
            },
            EventKind::WorkerPanicked => {
                self.log.error(format!(
                    "[panicked] worker={} reason={:?}",
                    worker(e),
                    e.reason
                ));
            }
            EventKind::WorkerExited => {
                self.log.info(format!("[exited] worker={}", worker(e)));
            }
            EventKind::SignalReceived => {
                self.log.info(format!("[signal] {:?}", e.signal));
            }
            EventKind::ShutdownRequested => {
                self.log.info(format!("[shutdown-requested] signal={:?}", e.signal));
            }
            EventKind::StopRequested => {
                self.log.debug(format!(
                    "[stop-requested] worker={} signal={:?}",
                    worker(e),
                    e.signal
                ));
            }
            EventKind::AllStopped => {
                self.log.info("[all-stopped]");
            }
            EventKind::DeadlineExceeded => {
                self.log
                    .error(format!("[deadline-exceeded] stuck={:?}", e.reason));
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                self.log.warn(format!(
                    "[subscriber] name={} reason={:?}",
                    worker(e),
                    e.reason
                ));
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
