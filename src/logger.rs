//! # Named, leveled log sinks.
//!
//! Every distinguishable unit (the control loop, each worker, each task body)
//! gets its own [`Logger`]. A logger carries the unit name and its own maximum
//! level, and forwards enabled messages to [`tracing`] tagged with `unit`.
//! The process-wide `tracing` subscriber is installed by the binary.
//!
//! ## Levels
//! Configuration files use numeric levels:
//! ```text
//! 10 → debug   20 → info   30 → warning   40 → error
//! ```
//! Values in between round down to the closest named level; anything below
//! 10 enables trace, anything at or above 40 keeps errors only.

use std::sync::Arc;

use tracing::Level;

use crate::config::Config;

/// Numeric level used when a config key is missing.
pub const DEFAULT_LEVEL: u8 = 20;

/// Converts a numeric config level into a [`tracing::Level`].
pub fn level_from_number(n: u8) -> Level {
    match n {
        0..=9 => Level::TRACE,
        10..=19 => Level::DEBUG,
        20..=29 => Level::INFO,
        30..=39 => Level::WARN,
        _ => Level::ERROR,
    }
}

/// Log sink for one unit.
///
/// Cheap to clone; clones share the unit name.
#[derive(Debug, Clone)]
pub struct Logger {
    unit: Arc<str>,
    max_level: Level,
}

impl Logger {
    /// Creates a logger for `unit` that emits messages at `max_level` and above.
    pub fn new(unit: impl Into<Arc<str>>, max_level: Level) -> Self {
        Self {
            unit: unit.into(),
            max_level,
        }
    }

    /// Creates a logger whose level is read from `key` in `config`
    /// (numeric level, default [`DEFAULT_LEVEL`]).
    pub fn from_config(unit: impl Into<Arc<str>>, config: &Config, key: &str) -> Self {
        let n = config.get(key, DEFAULT_LEVEL);
        Self::new(unit, level_from_number(n))
    }

    /// Unit name this logger reports as.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns true if messages at `level` pass this logger's filter.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    /// Emits `msg` at `level` if enabled.
    pub fn log(&self, level: Level, msg: impl AsRef<str>) {
        if !self.enabled(level) {
            return;
        }
        let unit = &*self.unit;
        let msg = msg.as_ref();
        match level {
            Level::TRACE => tracing::trace!(unit, "{msg}"),
            Level::DEBUG => tracing::debug!(unit, "{msg}"),
            Level::INFO => tracing::info!(unit, "{msg}"),
            Level::WARN => tracing::warn!(unit, "{msg}"),
            Level::ERROR => tracing::error!(unit, "{msg}"),
        }
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        self.log(Level::DEBUG, msg);
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.log(Level::INFO, msg);
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.log(Level::WARN, msg);
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.log(Level::ERROR, msg);
    }
}

const CYAN: &str = "\x1b[36m";
const BLUE: &str = "\x1b[94m";
const LIGHT_CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[39m";

/// Width of the separator line, used to center the application name.
const BANNER_WIDTH: usize = 29;

/// Prints a colored separator line.
pub fn print_separator(log: &Logger) {
    log.info(format!("{CYAN}-{BLUE}==========================={CYAN}-{RESET}"));
}

/// Prints the start-of-run banner with the centered application name.
pub fn print_header(log: &Logger, app_name: &str) {
    log.info(format!("          {CYAN}_   {BLUE}__  {CYAN}_{RESET}"));
    log.info(format!(
        "     {LIGHT_CYAN}_  {CYAN}_// {BLUE}/\\\\ \\ {CYAN}\\\\_  {LIGHT_CYAN}_{RESET}"
    ));
    log.info(format!(
        "   {LIGHT_CYAN}_// {CYAN}/ / {BLUE}/ /_\\ \\ {CYAN}\\ \\ {LIGHT_CYAN}\\\\_{RESET}"
    ));
    log.info(format!(
        "  {LIGHT_CYAN}/ / {CYAN}/ / {BLUE}/ ___\\\\ \\ {CYAN}\\ \\ {LIGHT_CYAN}\\ \\{RESET}"
    ));
    log.info(format!(
        " {LIGHT_CYAN}/_/ {CYAN}/_/ {BLUE}/_/     \\_\\ {CYAN}\\_\\ {LIGHT_CYAN}\\_\\{RESET}"
    ));
    print_separator(log);
    let pad = BANNER_WIDTH.saturating_sub(app_name.chars().count()) / 2;
    log.info(format!("{CYAN}{:pad$}{app_name}{RESET}", ""));
    print_separator(log);
}

/// Prints the end-of-run banner.
pub fn print_footer(log: &Logger) {
    log.info("Goodbye !");
    print_separator(log);
    log.info(format!(
        " {LIGHT_CYAN}\\_\\ {CYAN}\\_\\             {CYAN}/_/ {LIGHT_CYAN}/_/{RESET}"
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_levels() {
        assert_eq!(level_from_number(10), Level::DEBUG);
        assert_eq!(level_from_number(20), Level::INFO);
        assert_eq!(level_from_number(25), Level::INFO);
        assert_eq!(level_from_number(30), Level::WARN);
        assert_eq!(level_from_number(40), Level::ERROR);
        assert_eq!(level_from_number(50), Level::ERROR);
        assert_eq!(level_from_number(0), Level::TRACE);
    }

    #[test]
    fn test_filtering() {
        let log = Logger::new("main", Level::WARN);
        assert!(log.enabled(Level::ERROR));
        assert!(log.enabled(Level::WARN));
        assert!(!log.enabled(Level::INFO));
        assert!(!log.enabled(Level::DEBUG));
    }

    #[test]
    fn test_from_config() {
        let cfg = Config::from_value(json!({ "logging_level_worker": 10 })).unwrap();
        let worker = Logger::from_config("w", &cfg, "logging_level_worker");
        assert!(worker.enabled(Level::DEBUG));
        assert_eq!(worker.unit(), "w");

        let main = Logger::from_config("main", &cfg, "logging_level_main");
        assert!(!main.enabled(Level::DEBUG));
        assert!(main.enabled(Level::INFO));
    }
}
