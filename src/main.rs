//! workvisor - runs the example worker under the supervisor.
//!
//! Bootstrap order:
//! 1. load the config file (relative to the launch directory),
//! 2. move the working directory next to the executable,
//! 3. refuse to run as root unless allowed,
//! 4. run the supervisor until its workers stopped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use workvisor::logger::{print_footer, print_header, print_separator};
use workvisor::{
    Config, ExitCode, LogWriter, Logger, MAIN_UNIT, Subscribe, Supervisor, SupervisorConfig,
    example_worker,
};

/// Minimal supervisor for long-running background workers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "../config.json")]
    config: PathBuf,

    /// Application name shown in the banner
    #[arg(long, default_value = "My App")]
    name: String,

    /// Allow running with root privileges
    #[arg(long)]
    allow_root: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Units filter their own levels; the subscriber lets everything from this crate through.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workvisor=trace"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    run(args).await.exit();
}

async fn run(args: Args) -> ExitCode {
    let config = match Config::load(&args.config) {
        Ok(config) => Arc::new(config),
        Err(err) => {
            let log = Logger::new(MAIN_UNIT, Level::ERROR);
            log.error(format!("Failed to load the config file ! ({})", err.as_label()));
            log.error(err.to_string());
            return ExitCode::ConfigError;
        }
    };

    let log = Logger::from_config(MAIN_UNIT, &config, "logging_level_main");
    print_header(&log, &args.name);

    log.info("Correcting CWD...");
    if let Err(err) = correct_cwd(&log) {
        log.error("Failed to change the current working directory !");
        log.error(format!("{err:#}"));
        return ExitCode::CwdFailure;
    }

    if is_root() && !(args.allow_root || config.get("allow_root", false)) {
        log.error("Refusing to run as root !");
        return ExitCode::RunningAsRoot;
    }

    log.info("Preparing workers...");
    let suffix: String = config.get("example_name_suffix", "demo".to_string());
    let worker = match example_worker(
        Arc::clone(&config),
        &suffix,
        Duration::from_millis(config.get("example_sleep_length_ms", 750)),
        config.get("example_sleep_count", 5),
    ) {
        Ok(worker) => worker,
        Err(err) => {
            log.error(format!("Failed to prepare workers: {err}"));
            return ExitCode::RuntimeFailure;
        }
    };

    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new(
        Logger::from_config("events", &config, "logging_level_events"),
    ))];
    let supervisor = Supervisor::builder(SupervisorConfig::from_config(&config))
        .with_worker(worker)
        .with_subscribers(subscribers)
        .with_logger(log.clone())
        .build();

    print_separator(&log);
    let code = match supervisor.run().await {
        Ok(report) => {
            log.debug(format!(
                "Shutdown cause: {:?}, results: {:?}",
                report.cause, report.results
            ));
            ExitCode::Success
        }
        Err(err) => {
            log.error(format!("Supervisor failed ({}): {err}", err.as_label()));
            ExitCode::RuntimeFailure
        }
    };

    print_footer(&log);
    code
}

/// Moves the working directory to the directory holding the executable.
fn correct_cwd(log: &Logger) -> anyhow::Result<()> {
    let original = std::env::current_dir().context("cannot read the current directory")?;
    let exe = std::env::current_exe().context("cannot locate the executable")?;
    let exe = exe
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", exe.display()))?;
    let target = exe
        .parent()
        .context("the executable has no parent directory")?;

    log.debug(format!("* Original: '{}'", original.display()));
    log.debug(format!("* Final: '{}'", target.display()));
    std::env::set_current_dir(target)
        .with_context(|| format!("cannot enter {}", target.display()))?;
    Ok(())
}

#[cfg(unix)]
fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}
