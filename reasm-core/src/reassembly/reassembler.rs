//! # Stream Reassembler
//!
//! Turns indexed substrings, delivered in any order and with arbitrary
//! overlap or duplication, back into the original byte stream.
//!
//! ## Algorithm
//!
//! Every call to [`Reassembler::insert`] runs the same pipeline:
//!
//! 1. Record the end-of-stream index when the substring is marked last
//! 2. Trim the range to the acceptance window (see [`AcceptanceWindow`])
//! 3. Drop it if an existing pending segment already covers it
//! 4. Merge with a touching predecessor and all touching successors
//! 5. Flush every segment whose start equals `next_index` into the stream
//! 6. Close the stream once everything up to the end-of-stream index is written
//!
//! ## Pending Segments
//!
//! Out-of-order data lives in a `BTreeMap` keyed by absolute start index.
//! After every insertion the segments are pairwise disjoint and never
//! adjacent, every key is `>= next_index`, and every segment ends inside the
//! current window.
//!
//! ```text
//! next_index = 4
//!
//! stream:    [0 1 2 3]
//! pending:             . . [6 7 8] . [10 11]
//!
//! insert(5, "5 6") -> merges with [6 7 8] into [5 6 7 8]
//! insert(4, "4")   -> touches [5..9), flush [4..9); [10 11] stays pending
//! ```
//!
//! ## Overlap Tie-Break
//!
//! Bytes already stored win. A newer write only ever contributes bytes at
//! indices that nothing else currently covers.

use crate::config::StreamConfig;
use crate::reassembly::window::{AcceptanceWindow, Trim};
use crate::stream::{ByteStream, Reader};
use crate::types::StreamIndex;
use bytes::BytesMut;
use core::ops::Bound::{Excluded, Unbounded};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Reassembles indexed substrings into an owned [`ByteStream`].
#[derive(Debug)]
pub struct Reassembler {
    /// Destination stream. Only the flush path writes to it.
    output: ByteStream,

    /// Received but not yet writable ranges, keyed by start index
    segments: BTreeMap<StreamIndex, BytesMut>,

    /// Sum of all segment lengths
    pending_bytes: u64,

    /// One past the last byte of the stream, once the last substring is seen
    eof_index: Option<StreamIndex>,
}

impl Reassembler {
    /// Take ownership of `output` and reassemble into it
    pub fn new(output: ByteStream) -> Self {
        Self {
            output,
            segments: BTreeMap::new(),
            pending_bytes: 0,
            eof_index: None,
        }
    }

    /// Reassembler over a fresh stream of the given capacity
    pub fn with_capacity(capacity: u64) -> Self {
        Self::new(ByteStream::new(capacity))
    }

    /// Reassembler over a fresh stream built from configuration
    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(ByteStream::from_config(config))
    }

    /// Insert the substring `data` that starts at absolute `first_index`.
    ///
    /// `is_last_substring` marks `first_index + data.len()` as the end of the
    /// stream; a later call with the flag set overwrites it.
    ///
    /// Redundant or out-of-window input is absorbed silently. Bytes that fall
    /// outside the window are lost and must be resent by the caller.
    pub fn insert(&mut self, first_index: StreamIndex, data: &[u8], is_last_substring: bool) {
        trace!(
            first_index,
            len = data.len(),
            is_last_substring,
            next_index = self.next_index(),
            pending = self.pending_bytes,
            available = self.output.available_capacity(),
            "insert"
        );

        if is_last_substring {
            self.record_eof(first_index.saturating_add(data.len() as u64));
        }

        let window = self.acceptance_window();
        let (start, payload) = match window.trim(first_index, data.len()) {
            Trim::Keep { start, range } if !range.is_empty() => (start, &data[range]),
            _ => {
                self.close_if_complete();
                return;
            }
        };

        if self.is_covered(start, payload.len()) {
            debug!(start, len = payload.len(), "substring already pending, dropped");
            self.close_if_complete();
            return;
        }

        self.store(start, payload);
        self.flush();
        self.close_if_complete();

        debug_assert_eq!(
            self.pending_bytes,
            self.segments.values().map(|seg| seg.len() as u64).sum::<u64>()
        );
    }

    /// Bytes held in pending segments, not yet written to the stream
    pub fn count_bytes_pending(&self) -> u64 {
        self.pending_bytes
    }

    /// Absolute index of the next byte the stream expects
    pub fn next_index(&self) -> StreamIndex {
        self.output.bytes_pushed()
    }

    /// End-of-stream index, once a last substring has been inserted
    pub fn eof_index(&self) -> Option<StreamIndex> {
        self.eof_index
    }

    /// Range of indices that would currently be retained.
    ///
    /// Empty once the stream is closed, since nothing can be written anymore.
    pub fn acceptance_window(&self) -> AcceptanceWindow {
        let next_index = self.next_index();
        if self.output.is_closed() {
            AcceptanceWindow::empty(next_index)
        } else {
            AcceptanceWindow::new(next_index, self.output.available_capacity())
        }
    }

    /// Pending segments in index order
    pub fn pending_segments(&self) -> impl Iterator<Item = (StreamIndex, &[u8])> + '_ {
        self.segments
            .iter()
            .map(|(&start, seg)| (start, seg.as_ref()))
    }

    /// Consumer handle onto the owned stream
    pub fn reader(&mut self) -> Reader<'_> {
        self.output.reader()
    }

    /// Read-only view of the owned stream
    pub fn output(&self) -> &ByteStream {
        &self.output
    }

    /// Give up reassembly and return the stream
    pub fn into_inner(self) -> ByteStream {
        self.output
    }

    fn record_eof(&mut self, eof_index: StreamIndex) {
        if let Some(previous) = self.eof_index {
            if previous != eof_index {
                debug!(previous, eof_index, "end-of-stream index replaced");
            }
        }
        self.eof_index = Some(eof_index);
    }

    /// Whether a single pending segment covers `[start, start + len)`
    fn is_covered(&self, start: StreamIndex, len: usize) -> bool {
        let end = start + len as u64;
        self.segments
            .range(..=start)
            .next_back()
            .map_or(false, |(&seg_start, seg)| seg_start + seg.len() as u64 >= end)
    }

    /// Merge `[start, start + payload.len())` into the pending set.
    fn store(&mut self, start: StreamIndex, payload: &[u8]) {
        // Predecessor: greatest start <= `start` that overlaps or touches
        let predecessor = self
            .segments
            .range(..=start)
            .next_back()
            .filter(|&(&seg_start, seg)| seg_start + seg.len() as u64 >= start)
            .map(|(&seg_start, _)| seg_start);

        let (merged_start, mut merged) = match predecessor.and_then(|seg_start| {
            self.segments
                .remove(&seg_start)
                .map(|seg| (seg_start, seg))
        }) {
            Some((seg_start, mut seg)) => {
                self.pending_bytes -= seg.len() as u64;
                let overlap = (seg_start + seg.len() as u64 - start) as usize;
                debug!(
                    predecessor = seg_start,
                    start,
                    overlap,
                    "merging with predecessor"
                );
                seg.extend_from_slice(&payload[overlap..]);
                (seg_start, seg)
            }
            None => (start, BytesMut::from(payload)),
        };

        // Successors: absorb every segment that starts at or before our end
        loop {
            let merged_end = merged_start + merged.len() as u64;
            let successor = self
                .segments
                .range((Excluded(merged_start), Unbounded))
                .next()
                .map(|(&seg_start, _)| seg_start)
                .filter(|&seg_start| seg_start <= merged_end);
            let Some(seg_start) = successor else {
                break;
            };
            let Some(seg) = self.segments.remove(&seg_start) else {
                break;
            };
            self.pending_bytes -= seg.len() as u64;

            // Stored bytes win over the newer write in the overlap
            let offset = (seg_start - merged_start) as usize;
            let overlap = core::cmp::min(seg.len(), merged.len() - offset);
            merged[offset..offset + overlap].copy_from_slice(&seg[..overlap]);
            merged.extend_from_slice(&seg[overlap..]);
            debug!(successor = seg_start, merged_start, "merging with successor");
        }

        self.pending_bytes += merged.len() as u64;
        self.segments.insert(merged_start, merged);
    }

    /// Push every segment that starts at `next_index` into the stream.
    fn flush(&mut self) {
        loop {
            let next_index = self.next_index();
            let Some(entry) = self.segments.first_entry() else {
                break;
            };
            if *entry.key() != next_index {
                break;
            }
            let (start, seg) = entry.remove_entry();
            self.pending_bytes -= seg.len() as u64;
            self.output.writer().push(&seg);
            debug!(start, len = seg.len(), next_index = self.next_index(), "flushed segment");
            debug_assert_eq!(self.next_index(), start + seg.len() as u64);
        }
    }

    /// Close the stream once every byte up to the end-of-stream index is written.
    fn close_if_complete(&mut self) {
        let complete = match self.eof_index {
            Some(eof_index) => self.pending_bytes == 0 && self.next_index() >= eof_index,
            None => false,
        };
        if complete && !self.output.is_closed() {
            debug!(next_index = self.next_index(), "all data reassembled, closing stream");
            self.output.writer().close();
        }
    }
}
