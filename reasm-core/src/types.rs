//! Shared types and constants.

/// Absolute 0-based byte offset from the start of the logical stream.
///
/// Translation from wire-level sequence numbers happens above this crate.
pub type StreamIndex = u64;

/// Default stream capacity (64 KiB, a typical TCP receive window)
pub const DEFAULT_STREAM_CAPACITY: u64 = 64 * 1024;

/// Upper bound accepted by configuration validation (1 GiB)
pub const MAX_STREAM_CAPACITY: u64 = 1 << 30;

/// Lifecycle of a byte stream.
///
/// `Open → Closed → Finished`. The error flag is tracked separately and may
/// be raised in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Producer may still append bytes
    Open,

    /// No further bytes will be appended, but some remain unread
    Closed,

    /// Closed and fully drained
    Finished,
}

impl StreamState {
    /// Check if the producer side is closed
    pub fn is_closed(&self) -> bool {
        matches!(self, StreamState::Closed | StreamState::Finished)
    }
}
