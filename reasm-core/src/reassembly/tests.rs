//! # Reassembler Tests
//!
//! ## Test Coverage
//!
//! 1. **Flush** - in-order data goes straight to the stream
//! 2. **Buffering** - gaps hold later data back until filled
//! 3. **Merging** - overlap and adjacency with predecessor and successors
//! 4. **Window** - trimming and discarding against available capacity
//! 5. **End of stream** - closure, late finals, repeated finals
//! 6. **Tie-break** - bytes stored first win

#![cfg(test)]

use crate::reassembly::Reassembler;
use crate::stream::ByteStream;

fn segments(reassembler: &Reassembler) -> Vec<(u64, Vec<u8>)> {
    reassembler
        .pending_segments()
        .map(|(start, data)| (start, data.to_vec()))
        .collect()
}

fn drain(reassembler: &mut Reassembler) -> Vec<u8> {
    let mut reader = reassembler.reader();
    let out = reader.peek().to_vec();
    reader.pop(out.len() as u64).unwrap();
    out
}

// ============================================================================
// Flush and Buffering
// ============================================================================

mod flush_tests {
    use super::*;

    #[test]
    fn test_in_order_insert_flushes_immediately() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abcd", false);

        assert_eq!(r.output().peek(), b"abcd");
        assert_eq!(r.next_index(), 4);
        assert_eq!(r.count_bytes_pending(), 0);
        assert!(!r.output().is_closed());
    }

    #[test]
    fn test_gap_holds_data_back() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"cd", false);

        assert_eq!(r.output().bytes_pushed(), 0);
        assert_eq!(r.count_bytes_pending(), 2);
        assert_eq!(segments(&r), vec![(2, b"cd".to_vec())]);

        r.insert(0, b"ab", false);
        assert_eq!(r.output().peek(), b"abcd");
        assert_eq!(r.count_bytes_pending(), 0);
    }

    #[test]
    fn test_flush_stops_at_next_gap() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(1, b"b", false);
        r.insert(3, b"d", false);
        r.insert(0, b"a", false);

        assert_eq!(r.output().peek(), b"ab");
        assert_eq!(segments(&r), vec![(3, b"d".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 1);
    }

    #[test]
    fn test_many_reversed_single_bytes() {
        let mut r = Reassembler::with_capacity(64);
        let data = b"0123456789";
        for i in (1..data.len()).rev() {
            r.insert(i as u64, &data[i..i + 1], i == data.len() - 1);
        }
        // Adjacent bytes collapse into a single pending segment
        assert_eq!(segments(&r).len(), 1);
        assert_eq!(r.count_bytes_pending(), 9);

        r.insert(0, b"0", false);
        assert_eq!(drain(&mut r), data.to_vec());
        assert!(r.output().is_finished());
    }
}

// ============================================================================
// Merging
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_adjacent_successor_merges() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(5, b"fg", false);
        r.insert(3, b"de", false);

        assert_eq!(segments(&r), vec![(3, b"defg".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 4);
    }

    #[test]
    fn test_adjacent_predecessor_merges() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(3, b"de", false);
        r.insert(5, b"fg", false);

        assert_eq!(segments(&r), vec![(3, b"defg".to_vec())]);
    }

    #[test]
    fn test_overlapping_predecessor_extends() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"cde", false);
        r.insert(4, b"efg", false);

        assert_eq!(segments(&r), vec![(2, b"cdefg".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 5);
    }

    #[test]
    fn test_bridge_absorbs_several_successors() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"c", false);
        r.insert(5, b"f", false);
        r.insert(8, b"ij", false);
        assert_eq!(segments(&r).len(), 3);

        r.insert(1, b"bcdefghi", false);
        assert_eq!(segments(&r), vec![(1, b"bcdefghij".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 9);
    }

    #[test]
    fn test_predecessor_and_successor_joined() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(1, b"bc", false);
        r.insert(6, b"gh", false);
        r.insert(2, b"cdefg", false);

        assert_eq!(segments(&r), vec![(1, b"bcdefgh".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 7);
    }

    #[test]
    fn test_non_touching_segments_stay_apart() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(1, b"b", false);
        r.insert(3, b"d", false);

        assert_eq!(segments(&r), vec![(1, b"b".to_vec()), (3, b"d".to_vec())]);
    }

    #[test]
    fn test_contained_duplicate_is_dropped() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"cdef", false);
        r.insert(3, b"de", false);
        r.insert(2, b"cdef", false);

        assert_eq!(segments(&r), vec![(2, b"cdef".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 4);
    }

    #[test]
    fn test_same_start_longer_payload_extends() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"cd", false);
        r.insert(2, b"cdef", false);

        assert_eq!(segments(&r), vec![(2, b"cdef".to_vec())]);
    }
}

// ============================================================================
// Acceptance Window
// ============================================================================

mod window_tests {
    use super::*;

    #[test]
    fn test_right_edge_trimmed() {
        let mut r = Reassembler::with_capacity(4);
        r.insert(2, b"cdef", false);

        assert_eq!(segments(&r), vec![(2, b"cd".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 2);
    }

    #[test]
    fn test_beyond_window_discarded() {
        let mut r = Reassembler::with_capacity(4);
        r.insert(4, b"e", false);
        r.insert(9, b"xyz", false);

        assert_eq!(r.count_bytes_pending(), 0);
        assert_eq!(r.output().bytes_pushed(), 0);
    }

    #[test]
    fn test_full_stream_has_empty_window() {
        let mut r = Reassembler::with_capacity(4);
        r.insert(0, b"abcd", false);
        assert!(r.acceptance_window().is_empty());

        r.insert(4, b"e", false);
        assert_eq!(r.count_bytes_pending(), 0);
        assert_eq!(r.output().bytes_pushed(), 4);
    }

    #[test]
    fn test_popping_reopens_window() {
        let mut r = Reassembler::with_capacity(4);
        r.insert(0, b"abcd", false);
        r.reader().pop(2).unwrap();

        let window = r.acceptance_window();
        assert_eq!((window.start(), window.end()), (4, 6));

        r.insert(4, b"efgh", false);
        assert_eq!(r.output().peek(), b"cdef");
        assert_eq!(r.next_index(), 6);
    }

    #[test]
    fn test_left_edge_trimmed() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", false);
        r.insert(1, b"bcde", false);

        assert_eq!(r.output().peek(), b"abcde");
        assert_eq!(r.output().bytes_pushed(), 5);
    }

    #[test]
    fn test_already_delivered_discarded() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", false);
        r.insert(0, b"ab", false);

        assert_eq!(r.output().peek(), b"abc");
        assert_eq!(r.count_bytes_pending(), 0);
    }

    #[test]
    fn test_zero_capacity_accepts_nothing() {
        let mut r = Reassembler::new(ByteStream::new(0));
        r.insert(0, b"abc", false);

        assert_eq!(r.count_bytes_pending(), 0);
        assert_eq!(r.output().bytes_pushed(), 0);
    }

    #[test]
    fn test_huge_index_does_not_overflow() {
        let mut r = Reassembler::with_capacity(8);
        r.insert(u64::MAX - 1, b"abcdef", true);

        assert_eq!(r.count_bytes_pending(), 0);
        assert_eq!(r.eof_index(), Some(u64::MAX));
        assert!(!r.output().is_closed());
    }
}

// ============================================================================
// End of Stream
// ============================================================================

mod eof_tests {
    use super::*;

    #[test]
    fn test_last_in_order_substring_closes() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", true);

        assert!(r.output().is_closed());
        assert_eq!(r.eof_index(), Some(3));
        assert_eq!(drain(&mut r), b"abc".to_vec());
        assert!(r.output().is_finished());
    }

    #[test]
    fn test_last_substring_waits_for_gap() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(3, b"def", true);
        assert!(!r.output().is_closed());

        r.insert(0, b"abc", false);
        assert!(r.output().is_closed());
        assert_eq!(r.output().peek(), b"abcdef");
    }

    #[test]
    fn test_empty_last_substring_at_end() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", false);
        r.insert(3, b"", true);

        assert!(r.output().is_closed());
    }

    #[test]
    fn test_late_duplicate_final_closes() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", false);
        // Entirely before the window, but carries the end-of-stream marker
        r.insert(0, b"abc", true);

        assert!(r.output().is_closed());
        assert_eq!(r.output().bytes_pushed(), 3);
    }

    #[test]
    fn test_final_beyond_window_still_records_eof() {
        let mut r = Reassembler::with_capacity(2);
        r.insert(0, b"ab", false);
        r.insert(2, b"c", true);

        assert_eq!(r.eof_index(), Some(3));
        assert!(!r.output().is_closed());
        assert_eq!(r.count_bytes_pending(), 0);
    }

    #[test]
    fn test_repeated_final_last_write_wins() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(5, b"", true);
        r.insert(8, b"", true);
        assert_eq!(r.eof_index(), Some(8));

        r.insert(0, b"abcde", false);
        assert!(!r.output().is_closed());

        r.insert(5, b"fgh", false);
        assert!(r.output().is_closed());
    }

    #[test]
    fn test_closed_stream_discards_further_data() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", true);
        r.insert(3, b"def", false);
        r.insert(10, b"xyz", false);

        assert_eq!(r.output().peek(), b"abc");
        assert_eq!(r.count_bytes_pending(), 0);
        assert!(r.acceptance_window().is_empty());
    }

    #[test]
    fn test_no_close_while_pending() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"c", false);
        r.insert(0, b"", true);

        // eof_index 0 is reached but a segment is still pending
        assert_eq!(r.eof_index(), Some(0));
        assert!(!r.output().is_closed());
        assert_eq!(r.count_bytes_pending(), 1);
    }
}

// ============================================================================
// Overlap Tie-Break
// ============================================================================

mod tie_break_tests {
    use super::*;

    #[test]
    fn test_predecessor_bytes_win() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(1, b"bc", false);
        r.insert(1, b"XYd", false);
        r.insert(0, b"a", false);

        assert_eq!(r.output().peek(), b"abcd");
    }

    #[test]
    fn test_successor_bytes_win() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(2, b"XY", false);
        r.insert(0, b"abcd", false);

        assert_eq!(r.output().peek(), b"abXY");
    }

    #[test]
    fn test_bridge_keeps_every_stored_byte() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(3, b"de", false);
        r.insert(7, b"h", false);
        r.insert(2, b"CDEFGH", false);

        assert_eq!(segments(&r), vec![(2, b"CdeFGh".to_vec())]);
        assert_eq!(r.count_bytes_pending(), 6);
    }

    #[test]
    fn test_flushed_bytes_win() {
        let mut r = Reassembler::with_capacity(64);
        r.insert(0, b"abc", false);
        r.insert(0, b"XYZd", false);

        assert_eq!(r.output().peek(), b"abcd");
    }
}
