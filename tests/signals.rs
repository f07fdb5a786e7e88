#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use workvisor::{
    Config, ShutdownCause, Signal, Supervisor, SupervisorConfig, TaskError, TaskFn, Worker,
    WorkerContext,
};

#[tokio::test]
async fn sigterm_is_bridged_into_shutdown() {
    let body = TaskFn::arc(|ctx: WorkerContext| async move {
        let sig = ctx.stopped().await;
        ctx.set_last_result(sig.id());
        Ok::<_, TaskError>(())
    });
    let cfg = SupervisorConfig {
        tick: Duration::from_millis(50),
        shutdown_poll: Duration::from_millis(10),
        ..SupervisorConfig::default()
    };
    let sup = Supervisor::builder(cfg)
        .with_worker(Worker::new("listener", Some(body), Arc::new(Config::empty())).unwrap())
        .build();

    let run = tokio::spawn(sup.run());
    // Let `run` register its listeners before the signal is sent.
    tokio::time::sleep(Duration::from_millis(200)).await;

    // SAFETY: sends SIGTERM to this process, whose handler is now owned by tokio.
    unsafe {
        libc::kill(libc::getpid(), libc::SIGTERM);
    }

    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("supervisor did not stop")
        .unwrap()
        .unwrap();

    assert_eq!(report.cause, ShutdownCause::Signal(Signal::Terminate));
    assert_eq!(report.results, vec![("listener".to_string(), Signal::Terminate.id())]);
}
