//! Segment-list input shape.
//!
//! A single-token line names a query sequence; two-token numeric lines
//! accumulate its length; four-token numeric lines each define one ungapped
//! segment versus a reference sequence. Segments become single-block records
//! when the next query name (or end of input) arrives, so the accumulated
//! query length is final. The reference length is unknown in this shape.

use crate::types::{Block, Bp};

use super::AlignmentRecord;

/// Reference sequence length is not declared by segment lists.
const UNKNOWN_SEQ_LEN: Bp = Bp::MAX;

#[derive(Debug, Clone)]
struct Segment {
    ref_name: String,
    ref_beg: Bp,
    qry_beg: Bp,
    size: Bp,
}

/// Mutable accumulator for the segment-list shape, owned by the reader.
#[derive(Debug, Default)]
pub struct SegmentState {
    qry_name: String,
    qry_len: Bp,
    segments: Vec<Segment>,
}

impl SegmentState {
    /// True once a query name has been seen, which enables the two- and
    /// four-token line shapes.
    pub fn is_active(&self) -> bool {
        !self.qry_name.is_empty()
    }

    /// Begin a new query sequence, flushing any pending segments of the
    /// previous one.
    pub fn start_query(&mut self, name: &str) -> Vec<AlignmentRecord> {
        let records = self.finish();
        self.qry_name = name.to_string();
        self.qry_len = 0;
        records
    }

    pub fn add_length(&mut self, len_field: &str) {
        if let Ok(n) = len_field.parse::<Bp>() {
            self.qry_len += n;
        }
    }

    /// Record one ungapped segment: `refName refBeg qryText refEnd`.
    /// A reversed reference interval (`beg > end`) is encoded by negating
    /// the begin coordinate.
    pub fn add_segment(&mut self, fields: &[&str]) {
        let (beg, end) = match (fields[1].parse::<Bp>(), fields[3].parse::<Bp>()) {
            (Ok(b), Ok(e)) => (b, e),
            _ => return,
        };
        let size = (end - beg).abs();
        let ref_beg = if beg > end { -beg } else { beg };
        self.segments.push(Segment {
            ref_name: fields[0].to_string(),
            ref_beg,
            qry_beg: self.qry_len,
            size,
        });
        self.qry_len += size;
    }

    /// Flush pending segments as one single-block record each.
    pub fn finish(&mut self) -> Vec<AlignmentRecord> {
        let qry_name = self.qry_name.clone();
        let qry_len = self.qry_len;
        self.segments
            .drain(..)
            .map(|s| AlignmentRecord {
                seq_name1: s.ref_name,
                seq_len1: UNKNOWN_SEQ_LEN,
                seq_name2: qry_name.clone(),
                seq_len2: qry_len,
                blocks: vec![Block::new(s.ref_beg, s.qry_beg, s.size)],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(state: &mut SegmentState, line: &str) -> Vec<AlignmentRecord> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.len() {
            1 => state.start_query(fields[0]),
            2 => {
                state.add_length(fields[1]);
                Vec::new()
            }
            4 => {
                state.add_segment(&fields);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_segments_flush_with_final_query_length() {
        let mut state = SegmentState::default();
        assert!(feed(&mut state, "qry1").is_empty());
        feed(&mut state, "gap 50");
        feed(&mut state, "chrA 100 x 130");
        feed(&mut state, "chrB 400 x 380");
        let records = state.finish();

        assert_eq!(records.len(), 2);
        // Both records carry the fully accumulated query length.
        assert_eq!(records[0].seq_len2, 100);
        assert_eq!(records[1].seq_len2, 100);

        assert_eq!(records[0].blocks, vec![Block::new(100, 50, 30)]);
        // Reversed reference interval: negated begin, query keeps advancing.
        assert_eq!(records[1].blocks, vec![Block::new(-400, 80, 20)]);
    }

    #[test]
    fn test_new_query_flushes_previous() {
        let mut state = SegmentState::default();
        feed(&mut state, "qry1");
        feed(&mut state, "chrA 0 x 10");
        let flushed = feed(&mut state, "qry2");
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].seq_name2, "qry1");
        assert!(state.finish().is_empty());
    }
}
