//! Replay configuration module.
//!
//! # Example
//!
//! ```toml
//! [stream]
//! capacity = 65536
//!
//! [logging]
//! level = "debug"
//! json_format = false
//!
//! [output]
//! drain = "each_insert"
//! read_chunk = 4096
//! ```

pub mod loader;
pub mod logging;


pub use loader::{load_config, print_default_config, CliArgs};
pub use logging::{LogLevel, LoggingConfig};

use reasm_core::StreamConfig;
use serde::{Deserialize, Serialize};

/// Top-level replay configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Stream capacity (bounds both buffered and pending bytes)
    pub stream: StreamConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// How reassembled bytes are drained from the stream
    pub output: OutputConfig,
}

impl ReplayConfig {
    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.stream.validate() {
            errors.extend(e.into_iter().map(|err| format!("stream: {}", err)));
        }

        if let Err(e) = self.output.validate() {
            errors.extend(e.into_iter().map(|err| format!("output: {}", err)));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// When the replay loop reads from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainPolicy {
    /// Drain after every insertion, like an application that keeps up
    EachInsert,

    /// Drain once after the whole script.
    ///
    /// Anything beyond the stream capacity is lost, which makes this useful
    /// for exercising the acceptance window.
    AtEnd,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        DrainPolicy::EachInsert
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Drain policy
    ///
    /// **Default:** `each_insert`
    pub drain: DrainPolicy,

    /// Maximum bytes taken from the stream per read
    ///
    /// **Default:** 4096
    pub read_chunk: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            drain: DrainPolicy::default(),
            read_chunk: 4096,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.read_chunk == 0 {
            return Err(vec!["read_chunk must be > 0".to_string()]);
        }
        Ok(())
    }
}
