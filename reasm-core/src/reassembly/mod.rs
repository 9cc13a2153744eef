//! # Out-of-Order Reassembly
//!
//! Buffers byte ranges that arrive ahead of the read position, merges them
//! into disjoint segments, and flushes each contiguous prefix into the owned
//! [`ByteStream`](crate::ByteStream).

pub mod reassembler;
pub mod window;

#[cfg(test)]
mod tests;

pub use reassembler::Reassembler;
pub use window::{AcceptanceWindow, Trim};
