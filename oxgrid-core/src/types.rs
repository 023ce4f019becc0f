use std::collections::HashMap;

/// A base-pair position. Signed: a negative value encodes a position in
/// reverse-strand coordinate space, whose magnitude is the true position.
pub type Bp = i64;

/// A maximal gapless aligned run between two sequences.
///
/// `beg1`/`beg2` may be negative (reverse strand); `size` is always positive.
/// Blocks within one alignment are monotonic increasing in both coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub beg1: Bp,
    pub beg2: Bp,
    pub size: Bp,
}

impl Block {
    pub fn new(beg1: Bp, beg2: Bp, size: Bp) -> Self {
        Self { beg1, beg2, size }
    }

    pub fn end1(&self) -> Bp {
        self.beg1 + self.size
    }

    pub fn end2(&self) -> Bp {
        self.beg2 + self.size
    }
}

/// A pairwise alignment between two named sequences, as an ordered list of
/// gapless blocks. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub seq1: String,
    pub seq2: String,
    pub blocks: Vec<Block>,
}

impl Alignment {
    pub fn new(seq1: String, seq2: String, blocks: Vec<Block>) -> Self {
        Self { seq1, seq2, blocks }
    }

    /// Sequence name on the given axis (0 = first axis, 1 = second axis).
    pub fn name(&self, seq_index: usize) -> &str {
        if seq_index == 0 {
            &self.seq1
        } else {
            &self.seq2
        }
    }

    /// Total number of aligned letter pairs.
    pub fn aligned_pairs(&self) -> Bp {
        self.blocks.iter().map(|b| b.size).sum()
    }

    /// True if the two sides of this alignment are on opposite strands.
    pub fn is_cross_strand(&self) -> bool {
        let head = &self.blocks[0];
        (head.beg1 < 0) != (head.beg2 < 0)
    }
}

/// Strand choice for a displayed sequence: 0 = unspecified, 1 = forward,
/// 2 = reverse.
pub type StrandNum = u8;

/// A displayed stretch of one sequence on one axis. `beg < end`, `beg >= 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRange {
    pub name: String,
    pub beg: Bp,
    pub end: Bp,
    pub strand_num: StrandNum,
}

impl SeqRange {
    pub fn new(name: String, beg: Bp, end: Bp) -> Self {
        Self {
            name,
            beg,
            end,
            strand_num: 0,
        }
    }

    pub fn len(&self) -> Bp {
        self.end - self.beg
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.beg
    }
}

/// A range whose orientation and pixel placement have been resolved.
/// `origin` defines the genomic-to-pixel mapping for its sequence:
/// `pixel = (origin + position) / bp_per_pix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrientedRange {
    pub beg: Bp,
    pub end: Bp,
    pub is_reverse: bool,
    pub origin: Bp,
}

/// Per-sequence covered intervals, appended during ingestion and finalized
/// by one merge pass.
pub type CoverMap = HashMap<String, Vec<(Bp, Bp)>>;
