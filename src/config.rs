//! Configuration management for Slidegate.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, SlidegateError};

/// Configuration for a rate limiter instance.
///
/// The config is immutable for the lifetime of the limiter it is handed to.
/// Invalid values are rejected when the limiter is constructed (or when the
/// config is loaded from a file), never deferred to the first call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Namespace prefix prepended to every identifier when deriving the
    /// store key. Two limiters with different prefixes never collide, even
    /// for the same raw identifier.
    pub prefix: String,

    /// Length of the trailing window in milliseconds.
    pub window_ms: u64,

    /// Maximum number of admissions inside one window.
    pub max_requests: u64,
}

impl LimiterConfig {
    /// Create a new configuration.
    pub fn new(prefix: impl Into<String>, window_ms: u64, max_requests: u64) -> Self {
        Self {
            prefix: prefix.into(),
            window_ms,
            max_requests,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(SlidegateError::Config("prefix must not be empty".into()));
        }
        if self.window_ms == 0 {
            return Err(SlidegateError::Config(
                "window_ms must be greater than zero".into(),
            ));
        }
        if self.max_requests == 0 {
            return Err(SlidegateError::Config(
                "max_requests must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading rate limiter configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LimiterConfig = serde_yaml::from_str(yaml)
            .map_err(|e| SlidegateError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
