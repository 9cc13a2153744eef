//! Segment script replay.
//!
//! A script is a TOML list of insertions, applied in file order:
//!
//! ```toml
//! [[segments]]
//! index = 3
//! data = "de"
//!
//! [[segments]]
//! index = 0
//! data = "abc"
//! last = true
//! ```

use crate::config::{DrainPolicy, OutputConfig, ReplayConfig};
use anyhow::{Context, Result};
use reasm_core::{Reassembler, StreamIndex};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// One scripted insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    /// Absolute index of the first byte
    pub index: StreamIndex,

    /// Payload
    #[serde(default)]
    pub data: String,

    /// Marks the end of the stream
    #[serde(default)]
    pub last: bool,
}

/// Ordered list of insertions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentScript {
    #[serde(default)]
    pub segments: Vec<ScriptSegment>,
}

impl SegmentScript {
    /// Parse a script from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse segment script")
    }

    /// Load a script from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read segment script: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid segment script: {}", path.display()))
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Insertions applied
    pub segments_inserted: usize,

    /// Bytes written to the output
    pub bytes_written: u64,

    /// Bytes still held by the reassembler
    pub bytes_pending: u64,

    /// Whether the stream reached its end and was fully drained
    pub finished: bool,
}

/// Drives a [`Reassembler`] from a [`SegmentScript`].
#[derive(Debug)]
pub struct Replayer {
    reassembler: Reassembler,
    output: OutputConfig,
}

impl Replayer {
    /// Create a replayer over a fresh stream
    pub fn new(config: &ReplayConfig) -> Self {
        Self {
            reassembler: Reassembler::from_config(&config.stream),
            output: config.output.clone(),
        }
    }

    /// Apply every insertion in `script` and write the reassembled bytes to `out`.
    pub fn run<W: Write>(&mut self, script: &SegmentScript, out: &mut W) -> Result<ReplaySummary> {
        let mut bytes_written = 0;

        for (n, segment) in script.segments.iter().enumerate() {
            self.reassembler
                .insert(segment.index, segment.data.as_bytes(), segment.last);
            debug!(
                n,
                index = segment.index,
                len = segment.data.len(),
                last = segment.last,
                next_index = self.reassembler.next_index(),
                pending = self.reassembler.count_bytes_pending(),
                "segment applied"
            );

            if self.output.drain == DrainPolicy::EachInsert {
                bytes_written += self.drain(out)?;
            }
        }

        if self.output.drain == DrainPolicy::AtEnd {
            bytes_written += self.drain(out)?;
        }

        let summary = ReplaySummary {
            segments_inserted: script.segments.len(),
            bytes_written,
            bytes_pending: self.reassembler.count_bytes_pending(),
            finished: self.reassembler.output().is_finished(),
        };

        if summary.finished {
            info!(bytes = bytes_written, "stream fully reassembled");
        } else {
            warn!(
                bytes = bytes_written,
                pending = summary.bytes_pending,
                next_index = self.reassembler.next_index(),
                "stream incomplete at end of script"
            );
        }

        Ok(summary)
    }

    /// The underlying reassembler
    pub fn reassembler(&self) -> &Reassembler {
        &self.reassembler
    }

    fn drain<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        let mut written = 0;
        let mut reader = self.reassembler.reader();
        loop {
            let chunk = reader.try_read(self.output.read_chunk)?;
            if chunk.is_empty() {
                break;
            }
            out.write_all(&chunk).context("Failed to write reassembled bytes")?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}
