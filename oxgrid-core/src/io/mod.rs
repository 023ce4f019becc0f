//! Alignment input parsing for oxgrid.
//!
//! Pairwise alignments arrive in one of four textual shapes, which may be
//! freely mixed within one stream: a segment-list shape, PSL (wide tabular),
//! LAST tabular, and MAF paired lines. Each input line is classified by its
//! leading tokens into an explicit [`LineKind`], then handed to a dedicated
//! parser that produces the one canonical [`AlignmentRecord`] type.
//!
//! The parsers are best-effort and non-validating: malformed or unrecognized
//! lines are silently skipped. This is documented behavior, not a defect.

pub mod maf;
pub mod psl;
pub mod segment;
pub mod tab;

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;

use crate::types::{Block, Bp};

/// One normalized pairwise alignment: two named sequences with declared
/// lengths and an ordered list of gapless blocks.
///
/// Positions are normalized so that reverse strand is a negated coordinate
/// of equal magnitude, keeping downstream arithmetic strand-agnostic except
/// for one sign test. Translated (amino-acid) coordinates have already been
/// rescaled by 3, so both axes are in nucleotide-equivalent units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub seq_name1: String,
    pub seq_len1: Bp,
    pub seq_name2: String,
    pub seq_len2: Bp,
    pub blocks: Vec<Block>,
}

/// The shape of one input line, decided from its leading tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Comment,
    /// Single token: names the query sequence of a segment list.
    SegmentQuery,
    /// Two tokens, second numeric: accumulates query sequence length.
    SegmentLength,
    /// Four tokens, numeric begin/end: one ungapped segment vs a reference.
    Segment,
    /// More than 20 fields: PSL.
    Psl,
    /// Digit-leading line: LAST tabular.
    Tab,
    /// `s`-leading line: one half of a MAF alignment pair.
    MafSeq,
    /// Anything else: skipped.
    Unrecognized,
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Classify a non-empty line. `in_segment_list` is true once a segment-list
/// query name has been seen, enabling the two- and four-token shapes.
pub fn classify_line(line: &str, fields: &[&str], in_segment_list: bool) -> LineKind {
    if line.starts_with('#') {
        LineKind::Comment
    } else if fields.len() == 1 {
        LineKind::SegmentQuery
    } else if fields.len() == 2 && in_segment_list && is_all_digits(fields[1]) {
        LineKind::SegmentLength
    } else if fields.len() == 4
        && in_segment_list
        && is_all_digits(fields[1])
        && is_all_digits(fields[3])
    {
        LineKind::Segment
    } else if fields.len() > 20 {
        LineKind::Psl
    } else if line.as_bytes()[0].is_ascii_digit() {
        LineKind::Tab
    } else if fields[0] == "s" {
        LineKind::MafSeq
    } else {
        LineKind::Unrecognized
    }
}

/// Rescaling factors when one side of an alignment has translated
/// (amino-acid) coordinates: `(size_mul, seq1_mul, seq2_mul)`.
///
/// The side that is already DNA keeps its positions; the protein side has
/// its positions tripled, and block sizes are tripled so both axes advance
/// in nucleotide-equivalent units.
pub fn aa_to_nt_factors(is_translated1: bool, is_translated2: bool) -> (Bp, Bp, Bp) {
    match (is_translated1, is_translated2) {
        (true, true) => (3, 1, 1),
        (true, false) => (3, 1, 3), // seq1 is DNA, seq2 is protein
        (false, true) => (3, 3, 1), // seq2 is DNA, seq1 is protein
        (false, false) => (1, 1, 1),
    }
}

pub(crate) fn comma_separated_ints(text: &str) -> Option<Vec<Bp>> {
    text.trim_end_matches(',')
        .split(',')
        .map(|t| t.parse::<Bp>().ok())
        .collect()
}

/// Open an alignment file, transparently decompressing `.gz` input.
pub fn open_alignment_file<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let file = File::open(&path)?;
    if path.as_ref().to_string_lossy().ends_with(".gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Lazy, order-preserving reader of alignment records. Forward-only;
/// restartable only by re-reading the input.
pub struct AlignmentReader<R: BufRead> {
    reader: R,
    line: String,
    queue: VecDeque<AlignmentRecord>,
    segments: segment::SegmentState,
    maf_first: Option<maf::MafSeqLine>,
    done: bool,
}

impl<R: BufRead> AlignmentReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            queue: VecDeque::new(),
            segments: segment::SegmentState::default(),
            maf_first: None,
            done: false,
        }
    }

    fn handle_line(&mut self) {
        let line = self.line.trim_end();
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            return;
        }
        match classify_line(line, &fields, self.segments.is_active()) {
            LineKind::Comment | LineKind::Unrecognized => {}
            LineKind::SegmentQuery => {
                self.queue.extend(self.segments.start_query(fields[0]));
            }
            LineKind::SegmentLength => self.segments.add_length(fields[1]),
            LineKind::Segment => self.segments.add_segment(&fields),
            LineKind::Psl => self.queue.extend(psl::parse_line(&fields)),
            LineKind::Tab => self.queue.extend(tab::parse_line(&fields)),
            LineKind::MafSeq => {
                if let Some(half) = maf::parse_seq_line(&fields) {
                    match self.maf_first.take() {
                        None => self.maf_first = Some(half),
                        Some(first) => self.queue.push_back(maf::pair_records(first, half)),
                    }
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for AlignmentReader<R> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.queue.pop_front() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.done = true;
                    self.queue.extend(self.segments.finish());
                }
                Ok(_) => self.handle_line(),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// Read a whole alignment stream into memory.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<AlignmentRecord>> {
    AlignmentReader::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_classify_leading_tokens() {
        let cases = [
            ("# comment", LineKind::Comment),
            ("chrQ", LineKind::SegmentQuery),
            ("12 q 0 100 + 100 t 5 100 + 200 100", LineKind::Tab),
            ("s hg.chr1 0 10 + 50 ACGTACGTAC", LineKind::MafSeq),
            ("a score=12", LineKind::Unrecognized),
        ];
        for (line, want) in cases {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(classify_line(line, &fields, false), want, "{}", line);
        }
    }

    #[test]
    fn test_segment_shapes_need_active_query() {
        let line = "chrR 10 0 30";
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(classify_line(line, &fields, true), LineKind::Segment);
        assert_eq!(classify_line(line, &fields, false), LineKind::Unrecognized);
    }

    #[test]
    fn test_mixed_stream_order_preserved() {
        let text = "\
# header
12 one 0 10 + 100 two 0 10 + 200 10
s ref.chr1 0 5 + 50 ACGTA
s qry.chr2 3 5 + 60 ACGTA
";
        let records = read_records(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq_name1, "one");
        assert_eq!(records[1].seq_name1, "ref.chr1");
        assert_eq!(records[1].seq_name2, "qry.chr2");
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "not an alignment line at all\n9 too few fields\n";
        let records = read_records(Cursor::new(text)).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_gz_round_trip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::with_suffix(".tab.gz").unwrap();
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"12 one 0 10 + 100 two 0 10 + 200 10\n")
            .unwrap();
        file.write_all(&enc.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let reader = open_alignment_file(file.path()).unwrap();
        let records: Vec<_> = AlignmentReader::new(reader)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq_name2, "two");
    }
}
