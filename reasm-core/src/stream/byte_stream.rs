//! # Flow-Controlled Byte Stream
//!
//! [`ByteStream`] owns a buffer of at most `capacity` unread bytes. Access is
//! split into two capability handles so that appending and removing can never
//! be reached through the same handle:
//!
//! - [`Writer`]: `push`, `close`
//! - [`Reader`]: `peek`, `pop`, `read`, `set_error`
//!
//! Both handles, and the stream itself, expose the read-only counters.
//!
//! ## Backpressure by Truncation
//!
//! `push` never blocks and never fails. It appends as much of the input as
//! fits in `available_capacity()` and silently drops the rest. Producers that
//! cannot tolerate loss must size their writes to the available capacity.
//!
//! ## Counters
//!
//! ```text
//! bytes_buffered     = bytes_pushed - bytes_popped
//! available_capacity = capacity - bytes_buffered
//! ```

use crate::config::StreamConfig;
use crate::error::{Result, StreamError};
use crate::types::StreamState;
use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace, warn};

/// Capacity-bounded byte stream.
#[derive(Debug)]
pub struct ByteStream {
    /// Maximum number of unread bytes, fixed at construction
    capacity: u64,

    /// Unread bytes, oldest first
    buffer: BytesMut,

    /// No further bytes will be appended (monotonic)
    closed: bool,

    /// Consumer misused the stream (absorbing)
    error: bool,

    /// Lifetime bytes accepted by `push`
    bytes_pushed: u64,

    /// Lifetime bytes removed by the reader
    bytes_popped: u64,
}

impl ByteStream {
    /// Create a new empty stream holding at most `capacity` unread bytes
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            buffer: BytesMut::new(),
            closed: false,
            error: false,
            bytes_pushed: 0,
            bytes_popped: 0,
        }
    }

    /// Create a stream from configuration
    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Producer handle
    pub fn writer(&mut self) -> Writer<'_> {
        Writer { stream: self }
    }

    /// Consumer handle
    pub fn reader(&mut self) -> Reader<'_> {
        Reader { stream: self }
    }

    /// Fixed capacity of the stream
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bytes that can still be pushed before the buffer is full
    pub fn available_capacity(&self) -> u64 {
        self.capacity.saturating_sub(self.bytes_buffered())
    }

    /// Total bytes ever accepted by `push` (truncated bytes excluded)
    pub fn bytes_pushed(&self) -> u64 {
        self.bytes_pushed
    }

    /// Total bytes ever removed by the reader
    pub fn bytes_popped(&self) -> u64 {
        self.bytes_popped
    }

    /// Bytes currently held in the buffer
    pub fn bytes_buffered(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Whether the producer has closed the stream
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the stream is closed and fully drained
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    /// Whether the consumer has misused the stream
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// View of the buffered bytes, oldest first
    pub fn peek(&self) -> &[u8] {
        &self.buffer
    }

    /// Current lifecycle state
    pub fn state(&self) -> StreamState {
        match (self.closed, self.buffer.is_empty()) {
            (false, _) => StreamState::Open,
            (true, false) => StreamState::Closed,
            (true, true) => StreamState::Finished,
        }
    }

    fn push(&mut self, data: &[u8]) {
        if self.closed || data.is_empty() {
            return;
        }

        let available = self.available_capacity();
        let to_write = core::cmp::min(data.len() as u64, available) as usize;
        if to_write < data.len() {
            trace!(
                offered = data.len(),
                accepted = to_write,
                available,
                "push truncated at capacity"
            );
        }
        if to_write == 0 {
            return;
        }

        self.buffer.extend_from_slice(&data[..to_write]);
        self.bytes_pushed += to_write as u64;
    }

    fn close(&mut self) {
        if !self.closed {
            debug!(bytes_pushed = self.bytes_pushed, "stream closed");
        }
        self.closed = true;
    }

    fn pop(&mut self, len: u64) -> Result<()> {
        let buffered = self.bytes_buffered();
        if len > buffered {
            self.set_error();
            return Err(StreamError::Underflow {
                requested: len,
                buffered,
            });
        }

        self.buffer.advance(len as usize);
        self.bytes_popped += len;
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> Bytes {
        let n = core::cmp::min(max_len, self.buffer.len());
        let out = self.buffer.split_to(n).freeze();
        self.bytes_popped += n as u64;
        out
    }

    fn set_error(&mut self) {
        if !self.error {
            warn!(
                bytes_buffered = self.bytes_buffered(),
                bytes_popped = self.bytes_popped,
                "stream error flag raised"
            );
        }
        self.error = true;
    }
}

/// Producer handle onto a [`ByteStream`].
///
/// The only way to append bytes or close the stream.
#[derive(Debug)]
pub struct Writer<'a> {
    stream: &'a mut ByteStream,
}

impl Writer<'_> {
    /// Append as many leading bytes of `data` as fit; drop the rest.
    ///
    /// No-op once the stream is closed or when `data` is empty.
    pub fn push(&mut self, data: &[u8]) {
        self.stream.push(data);
    }

    /// Signal that no further bytes will be appended. Idempotent.
    pub fn close(&mut self) {
        self.stream.close();
    }

    /// Whether the stream has been closed
    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Bytes that can still be pushed
    pub fn available_capacity(&self) -> u64 {
        self.stream.available_capacity()
    }

    /// Total bytes ever accepted
    pub fn bytes_pushed(&self) -> u64 {
        self.stream.bytes_pushed()
    }
}

/// Consumer handle onto a [`ByteStream`].
///
/// The only way to remove bytes or raise the error flag.
#[derive(Debug)]
pub struct Reader<'a> {
    stream: &'a mut ByteStream,
}

impl Reader<'_> {
    /// View of the buffered bytes without removing them.
    ///
    /// The borrow ends before the next mutating call on this handle.
    pub fn peek(&self) -> &[u8] {
        self.stream.peek()
    }

    /// Remove `len` bytes from the front.
    ///
    /// # Errors
    /// Returns [`StreamError::Underflow`] and raises the error flag if `len`
    /// exceeds `bytes_buffered()`. Nothing is removed in that case.
    pub fn pop(&mut self, len: u64) -> Result<()> {
        self.stream.pop(len)
    }

    /// Remove and return up to `max_len` bytes from the front.
    pub fn read(&mut self, max_len: usize) -> Bytes {
        self.stream.read(max_len)
    }

    /// Like [`read`](Self::read), but refuses to hand out data from a stream
    /// whose error flag is set.
    pub fn try_read(&mut self, max_len: usize) -> Result<Bytes> {
        if self.stream.has_error() {
            return Err(StreamError::Errored);
        }
        Ok(self.stream.read(max_len))
    }

    /// Mark the stream as corrupted. Absorbing.
    pub fn set_error(&mut self) {
        self.stream.set_error();
    }

    /// Whether the stream is closed and fully drained
    pub fn is_finished(&self) -> bool {
        self.stream.is_finished()
    }

    /// Whether the error flag is set
    pub fn has_error(&self) -> bool {
        self.stream.has_error()
    }

    /// Bytes currently buffered
    pub fn bytes_buffered(&self) -> u64 {
        self.stream.bytes_buffered()
    }

    /// Total bytes ever removed
    pub fn bytes_popped(&self) -> u64 {
        self.stream.bytes_popped()
    }
}
