//! # Acceptance Window
//!
//! The half-open range `[next_index, next_index + available_capacity)` of
//! absolute indices that can be written into the stream now or once the
//! currently pending bytes have been flushed. Anything outside it is dropped.
//!
//! ```text
//!        already delivered   |      window      |   beyond capacity
//!   ─────────────────────────┼──────────────────┼────────────────────
//!                          start               end
//!
//!   [=======)                discard (ends at or before start)
//!        [========)          keep [start, ..)
//!                  [=====)   keep as is
//!                       [==========)           keep [.., end)
//!                                    [=====)   discard (starts at or after end)
//! ```

use crate::types::StreamIndex;
use core::ops::Range;

/// Outcome of trimming an incoming range against the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trim {
    /// Nothing of the range lies inside the window
    Discard,

    /// Part of the range survives
    Keep {
        /// Absolute index of the first surviving byte
        start: StreamIndex,

        /// Surviving bytes, relative to the incoming payload
        range: Range<usize>,
    },
}

/// Range of absolute indices currently acceptable for storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceWindow {
    start: StreamIndex,
    end: StreamIndex,
}

impl AcceptanceWindow {
    /// Window of `capacity` bytes beginning at `start`
    pub fn new(start: StreamIndex, capacity: u64) -> Self {
        Self {
            start,
            end: start.saturating_add(capacity),
        }
    }

    /// Window that admits nothing
    pub fn empty(start: StreamIndex) -> Self {
        Self { start, end: start }
    }

    /// First acceptable index (inclusive)
    pub fn start(&self) -> StreamIndex {
        self.start
    }

    /// One past the last acceptable index
    pub fn end(&self) -> StreamIndex {
        self.end
    }

    /// Number of acceptable indices
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the window admits nothing
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `index` lies inside the window
    pub fn contains(&self, index: StreamIndex) -> bool {
        self.start <= index && index < self.end
    }

    /// Trim the range `[first_index, first_index + len)` to the window.
    ///
    /// A range lying entirely before `start` or entirely at/after `end` is
    /// discarded wholesale. An empty range inside the window is kept as an
    /// empty `range`.
    pub fn trim(&self, first_index: StreamIndex, len: usize) -> Trim {
        let last = first_index.saturating_add(len as u64);

        let (start, skip) = if first_index < self.start {
            if last <= self.start {
                return Trim::Discard;
            }
            (self.start, (self.start - first_index) as usize)
        } else {
            (first_index, 0)
        };

        if start >= self.end {
            return Trim::Discard;
        }

        let keep_end = core::cmp::min(last, self.end);
        let take = (keep_end - first_index) as usize;
        Trim::Keep {
            start,
            range: skip..take,
        }
    }
}
