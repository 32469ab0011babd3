//! Runtime configuration for parser front ends.
//!
//! Defines the YAML-serializable settings for the device seam, the scan
//! engine and the batch runner.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! device:
//!   program: ssh
//!   args: ["-T", "admin@192.0.2.1"]
//!   timeout_ms: 30000
//! scan:
//!   tab_width: 4
//! batch:
//!   jobs: 4
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::ProcessDevice;
use crate::engine::ScanOptions;

/// Errors raised while loading or saving a [`ParsersConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A device was requested but the configuration has no `device` section.
    #[error("configuration has no `device` section")]
    MissingDevice,
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_timeout_ms() -> u64 {
    30_000
}

/// How to reach a device: a local program that receives the show command as
/// its last argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Program to run, e.g. `ssh`.
    pub program: String,
    /// Arguments placed before the command.
    #[serde(default)]
    pub args: Vec<String>,
    /// Per-command timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Batch runner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads; adaptive when absent.
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use showparse_parsers::config::ParsersConfig;
///
/// let config: ParsersConfig = serde_yaml::from_str("version: \"1.0\"").unwrap();
/// assert!(config.device.is_none());
/// assert_eq!(config.scan.tab_width, 4);
/// assert_eq!(config.batch.jobs, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsersConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceConfig>,
    /// Scan options passed to `parse_with` and
    /// [`parse_batch`](crate::batch::parse_batch).
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl ParsersConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Builds the configured [`ProcessDevice`].
    pub fn process_device(&self) -> Result<ProcessDevice> {
        let device = self.device.as_ref().ok_or(ConfigError::MissingDevice)?;
        Ok(ProcessDevice::new(
            device.program.clone(),
            device.args.clone(),
            Duration::from_millis(device.timeout_ms),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
device:
  program: ssh
  args: ["-T", "admin@192.0.2.1"]
  timeout_ms: 5000
scan:
  tab_width: 8
batch:
  jobs: 2
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ParsersConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        let device = config.device.as_ref().unwrap();
        assert_eq!(device.program, "ssh");
        assert_eq!(device.args, vec!["-T", "admin@192.0.2.1"]);
        assert_eq!(device.timeout_ms, 5000);
        assert_eq!(config.scan.tab_width, 8);
        assert_eq!(config.batch.jobs, Some(2));
    }

    #[test]
    fn test_device_timeout_defaults() {
        let yaml = "version: \"1.0\"\ndevice:\n  program: ssh\n";
        let config: ParsersConfig = serde_yaml::from_str(yaml).unwrap();
        let device = config.device.unwrap();
        assert!(device.args.is_empty());
        assert_eq!(device.timeout_ms, 30_000);
    }

    #[test]
    fn test_process_device_requires_device_section() {
        let config: ParsersConfig = serde_yaml::from_str("version: \"1.0\"").unwrap();
        assert!(matches!(config.process_device(), Err(ConfigError::MissingDevice)));

        let config: ParsersConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert!(config.process_device().is_ok());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showparse.yml");

        let original: ParsersConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = ParsersConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParsersConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_malformed_yaml_is_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "version: [unterminated").unwrap();
        let err = ParsersConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
