//! reasm-core: Flow-Controlled Stream Reassembly
//!
//! This crate is the receive side of a reliable byte-stream transport. It takes
//! byte ranges tagged with an absolute stream index, in any order and with any
//! amount of overlap or duplication, and delivers the original stream to a
//! reader in order.
//!
//! # Architecture
//!
//! - **Bounded buffer**: [`ByteStream`] holds at most `capacity` unread bytes
//! - **Capability handles**: a [`Writer`] may only append, a [`Reader`] may only remove
//! - **Window admission**: the [`Reassembler`] only retains bytes that fit in the
//!   acceptance window `[next_index, next_index + available_capacity)`
//! - **Interval merging**: pending ranges are kept disjoint and non-adjacent
//! - **No I/O, no locks**: every operation is synchronous and bounded
//!
//! # Module Organization
//!
//! - `stream`: the capacity-bounded byte stream and its reader/writer handles
//! - `reassembly`: the acceptance window and the reassembler
//! - `config`: serde-backed stream configuration
//! - `error`: consumer-side error type
//! - `types`: shared index types and constants
//!
//! # Example
//!
//! ```
//! use reasm_core::{ByteStream, Reassembler};
//!
//! let mut reassembler = Reassembler::new(ByteStream::new(16));
//! reassembler.insert(3, b"de", false);
//! reassembler.insert(0, b"abc", true);
//!
//! let mut reader = reassembler.reader();
//! assert_eq!(reader.peek(), b"abcde");
//! reader.pop(5).unwrap();
//! assert!(reader.is_finished());
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod reassembly;
pub mod stream;
pub mod types;

// Re-export key types
pub use config::StreamConfig;
pub use error::{Result, StreamError};
pub use reassembly::{AcceptanceWindow, Reassembler, Trim};
pub use stream::{ByteStream, Reader, Writer};
pub use types::{StreamIndex, StreamState, DEFAULT_STREAM_CAPACITY};
