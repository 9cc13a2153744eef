//! Stream configuration.

use crate::types::{DEFAULT_STREAM_CAPACITY, MAX_STREAM_CAPACITY};
use serde::{Deserialize, Serialize};

/// Configuration for a single reassembled stream.
///
/// ```toml
/// [stream]
/// capacity = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Maximum number of unread bytes the stream will hold.
    ///
    /// This also bounds how far ahead of the read position the reassembler
    /// retains out-of-order data.
    ///
    /// **Default:** 65536
    pub capacity: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_STREAM_CAPACITY,
        }
    }
}

impl StreamConfig {
    /// Validate stream configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.capacity == 0 {
            errors.push("capacity must be > 0".to_string());
        }

        if self.capacity > MAX_STREAM_CAPACITY {
            errors.push(format!(
                "capacity exceeds maximum ({} > {})",
                self.capacity, MAX_STREAM_CAPACITY
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
