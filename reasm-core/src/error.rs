//! Stream Error Types
//!
//! Only the consumer side of a [`ByteStream`](crate::ByteStream) can fail.
//! Untrusted input handed to the reassembler (duplicates, overlaps,
//! out-of-window ranges) is absorbed and never surfaces here.

use thiserror::Error;

/// Result type for consumer-side stream operations.
pub type Result<T> = core::result::Result<T, StreamError>;

/// Consumer misuse of a byte stream.
///
/// Both variants leave the stream's error flag set; a stream in that state
/// should be treated as corrupted by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    /// `pop` asked for more bytes than are currently buffered.
    #[error("pop of {requested} bytes exceeds {buffered} buffered bytes")]
    Underflow {
        /// Bytes the caller tried to remove
        requested: u64,
        /// Bytes actually buffered at the time
        buffered: u64,
    },

    /// The stream's error flag was already set.
    #[error("stream is in an error state")]
    Errored,
}
