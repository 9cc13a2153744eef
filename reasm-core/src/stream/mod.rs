//! # Byte Stream
//!
//! A capacity-bounded FIFO of bytes with a producer handle ([`Writer`]) and
//! a consumer handle ([`Reader`]) over one owned buffer.

pub mod byte_stream;

pub use byte_stream::{ByteStream, Reader, Writer};
