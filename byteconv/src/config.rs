//! Converter configuration

use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the converter worker
///
/// Missing JSON fields take their default values:
///
/// ```
/// use byteconv::ConverterConfig;
///
/// let config = ConverterConfig::from_reader(&br#"{"idle_interval_ms": 5}"#[..]).unwrap();
/// assert_eq!(config.idle_interval_ms, 5);
/// assert_eq!(config.thread_name, "byteconv-worker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Pause between polls of an empty source
    pub idle_interval_ms: u64,

    /// Name of the worker thread
    pub thread_name: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: 15,
            thread_name: "byteconv-worker".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the JSON is malformed.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ConfigError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(serde_json::from_slice(&buffer)?)
    }

    #[must_use]
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    #[must_use]
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: &str) -> Self {
        self.thread_name = name.to_string();
        self
    }
}
