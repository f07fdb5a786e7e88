//! # Shared read-only configuration.
//!
//! [`Config`] is a flat key → JSON value lookup loaded once at process start
//! and shared by the control loop and every worker as `Arc<Config>`.
//! It is never mutated after load, so readers need no synchronization.
//!
//! ## Rules
//! - The file must contain a JSON object; anything else is a [`ConfigError`].
//! - [`Config::get`] never fails: a missing key or a value that does not
//!   deserialize into the requested type yields the caller's default.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use workvisor::Config;
//!
//! let cfg = Config::from_value(json!({ "logging_level_main": 10 })).unwrap();
//! assert_eq!(cfg.get("logging_level_main", 20u8), 10);
//! assert_eq!(cfg.get("missing", 20u8), 20);
//! assert_eq!(cfg.get("logging_level_main", String::from("x")), "x");
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Immutable key → value configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    data: Map<String, Value>,
}

impl Config {
    /// Creates an empty configuration; every lookup returns its default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Object(data) => Ok(Self { data }),
            _ => Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Builds a configuration from an in-memory JSON value.
    ///
    /// Returns `None` when `value` is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(data) => Some(Self { data }),
            _ => None,
        }
    }

    /// Returns the value under `key`, or `default` when the key is absent or
    /// its value cannot be read as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.data
            .get(key)
            .and_then(|v| T::deserialize(v).ok())
            .unwrap_or(default)
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"example_sleep_count": 3, "allow_root": true}}"#).unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.get("example_sleep_count", 5u32), 3);
        assert!(cfg.get("allow_root", false));
        assert!(cfg.contains("allow_root"));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
    }

    #[test]
    fn test_load_non_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.as_label(), "config_not_an_object");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_io");
    }

    #[test]
    fn test_get_falls_back_on_type_mismatch() {
        let cfg = Config::from_value(serde_json::json!({ "tick": "fast" })).unwrap();
        assert_eq!(cfg.get("tick", 1000u64), 1000);
    }
}
