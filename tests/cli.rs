#![cfg(unix)]

use std::io::Write;
use std::process::Command;

use workvisor::ExitCode;

/// Unix keeps only the low byte of the exit status.
fn status_byte(code: ExitCode) -> i32 {
    code.code() & 0xff
}

#[test]
fn malformed_config_exits_with_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ this is not json").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_workvisor"))
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(status_byte(ExitCode::ConfigError)));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("Starting workers"), "{stdout}");
}

#[test]
fn missing_config_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_workvisor"))
        .arg("--config")
        .arg(dir.path().join("missing.json"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(status_byte(ExitCode::ConfigError)));
}

#[test]
fn example_worker_runs_to_completion() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"example_sleep_count": 2, "example_sleep_length_ms": 20, "supervisor_tick_ms": 50, "allow_root": true}}"#
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_workvisor"))
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Goodbye !"), "{stdout}");
}

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{body}").unwrap();
    file
}

fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[test]
fn root_is_refused_without_permission() {
    if !running_as_root() {
        return;
    }
    let file = config_file(r#"{"example_sleep_count": 1, "example_sleep_length_ms": 10}"#);

    let out = Command::new(env!("CARGO_BIN_EXE_workvisor"))
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(status_byte(ExitCode::RunningAsRoot)));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Refusing to run as root"), "{stdout}");
    assert!(!stdout.contains("Starting workers"), "{stdout}");
}

#[test]
fn allow_root_flag_permits_the_run() {
    let file = config_file(
        r#"{"example_sleep_count": 1, "example_sleep_length_ms": 10, "supervisor_tick_ms": 50}"#,
    );

    let out = Command::new(env!("CARGO_BIN_EXE_workvisor"))
        .arg("--config")
        .arg(file.path())
        .arg("--allow-root")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Starting workers"), "{stdout}");
}

/// Linux reports an error from `getcwd` once the working directory is removed.
#[cfg(target_os = "linux")]
#[test]
fn removed_working_directory_exits_with_cwd_failure() {
    let file = config_file(r#"{"allow_root": true}"#);
    let root = tempfile::tempdir().unwrap();
    let gone = root.path().join("gone");
    std::fs::create_dir(&gone).unwrap();

    let out = Command::new("sh")
        .arg("-c")
        .arg(r#"cd "$1" && rmdir "$1" && exec "$2" --config "$3""#)
        .arg("sh")
        .arg(&gone)
        .arg(env!("CARGO_BIN_EXE_workvisor"))
        .arg(file.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(status_byte(ExitCode::CwdFailure)));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("Starting workers"), "{stdout}");
}
