//! Interval arithmetic over alignment blocks: cropping to requested ranges,
//! per-sequence coverage accumulation, interval merging, and trimming of
//! unaligned flanks and gaps.

use std::collections::HashSet;

use crate::types::{Block, Bp, CoverMap, SeqRange};

/// Clip blocks to every pair of requested ranges. A requested range is
/// flipped into negative coordinate space when the alignment is on the
/// reverse strand of that axis (decided by the first block's sign). Blocks
/// that clip empty are dropped; a block straddling a range boundary is
/// emitted once per range-pair intersection it lies in.
pub fn cropped_blocks(blocks: &[Block], ranges1: &[(Bp, Bp)], ranges2: &[(Bp, Bp)]) -> Vec<Block> {
    let mut out = Vec::new();
    let head = match blocks.first() {
        Some(b) => b,
        None => return out,
    };
    for &(r1_beg, r1_end) in ranges1 {
        let (crop_beg1, crop_end1) = if head.beg1 < 0 {
            (-r1_end, -r1_beg)
        } else {
            (r1_beg, r1_end)
        };
        for &(r2_beg, r2_end) in ranges2 {
            let (crop_beg2, crop_end2) = if head.beg2 < 0 {
                (-r2_end, -r2_beg)
            } else {
                (r2_beg, r2_end)
            };
            for b in blocks {
                let b1 = crop_beg1.max(b.beg1);
                let e1 = crop_end1.min(b.end1());
                if b1 >= e1 {
                    continue;
                }
                let offset = b.beg2 - b.beg1;
                let b2 = crop_beg2.max(b1 + offset);
                let e2 = crop_end2.min(e1 + offset);
                if b2 >= e2 {
                    continue;
                }
                out.push(Block::new(b2 - offset, b2, e2 - b2));
            }
        }
    }
    out
}

/// Mutable coverage accumulator for one axis: the per-sequence covered
/// intervals plus the display ranges of each sequence, in first-seen order.
#[derive(Debug, Default)]
pub struct CoverContext {
    pub cover: CoverMap,
    pub seq_ranges: Vec<SeqRange>,
}

impl CoverContext {
    /// Record the extent covered by one alignment. The first time a
    /// sequence is seen, its requested display ranges are adopted.
    pub fn update(&mut self, seq_name: &str, ranges: &[(Bp, Bp)], covered: (Bp, Bp)) {
        let (beg, end) = covered;
        let covered = if beg < 0 { (-end, -beg) } else { (beg, end) };
        if let Some(intervals) = self.cover.get_mut(seq_name) {
            intervals.push(covered);
        } else {
            self.cover.insert(seq_name.to_string(), vec![covered]);
            for &(beg, end) in ranges {
                self.seq_ranges.push(SeqRange::new(seq_name.to_string(), beg, end));
            }
        }
    }

    /// Finalize into the minimal disjoint cover per sequence.
    pub fn merged(&self) -> CoverMap {
        self.cover
            .iter()
            .map(|(name, intervals)| {
                let mut sorted = intervals.clone();
                sorted.sort_unstable();
                (name.clone(), merged_ranges(&sorted))
            })
            .collect()
    }
}

/// Coalesce sorted intervals into the minimal disjoint cover. Adjacent
/// intervals are joined; the result is idempotent under re-merging.
pub fn merged_ranges(sorted: &[(Bp, Bp)]) -> Vec<(Bp, Bp)> {
    let mut out = Vec::new();
    let (mut old_beg, mut max_end) = match sorted.first() {
        Some(&r) => r,
        None => return out,
    };
    for &(beg, end) in sorted {
        if beg > max_end {
            out.push((old_beg, max_end));
            old_beg = beg;
            max_end = end;
        } else if end > max_end {
            max_end = end;
        }
    }
    out.push((old_beg, max_end));
    out
}

/// Total number of covered bases in a merged cover map.
pub fn covered_length(merged: &CoverMap) -> Bp {
    merged
        .values()
        .map(|v| v.iter().map(|(b, e)| e - b).sum::<Bp>())
        .sum()
}

/// Maximum tolerated unaligned gap, as fractions of the group's aligned
/// length: one limit for range ends, one for internal gaps.
#[derive(Debug, Clone, Copy)]
pub struct GapLimits {
    pub end_frac: f64,
    pub mid_frac: f64,
}

impl std::str::FromStr for GapLimits {
    type Err = std::num::ParseFloatError;

    /// `"1,4"` gives end fraction 1 and mid fraction 4; a single value
    /// applies to both.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (end, mid) = match text.split_once(',') {
            Some((a, b)) => (a, b),
            None => (text, text),
        };
        Ok(Self {
            end_frac: end.parse()?,
            mid_frac: mid.parse()?,
        })
    }
}

/// Shrink range ends to the outermost covered positions (plus `end_pad`)
/// when the naturally-unaligned flank is longer than tolerated, and split
/// ranges at internal gaps longer than tolerated, padding each side of the
/// split with `mid_pad`. Thresholds scale with `min_aligned_bases` so the
/// trimming tightness adapts to alignment density.
pub fn trimmed(
    seq_ranges: &[SeqRange],
    cover: &CoverMap,
    min_aligned_bases: Bp,
    limits: GapLimits,
    end_pad: Bp,
    mid_pad: Bp,
) -> Vec<SeqRange> {
    let max_end_gap = (limits.end_frac * min_aligned_bases as f64).max(end_pad as f64);
    let max_mid_gap = (limits.mid_frac * min_aligned_bases as f64).max(2.0 * mid_pad as f64);

    let mut out = Vec::new();
    for range in seq_ranges {
        let empty = Vec::new();
        let intervals = cover.get(&range.name).unwrap_or(&empty);
        let overlapping: Vec<(Bp, Bp)> = intervals
            .iter()
            .copied()
            .filter(|&(b, e)| b < range.end && e > range.beg)
            .collect();
        let (first, last) = match (overlapping.first(), overlapping.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => {
                out.push(range.clone());
                continue;
            }
        };
        let mut beg = range.beg;
        let mut end = range.end;
        if (first.0 - beg) as f64 > max_end_gap {
            beg = first.0 - end_pad;
        }
        for pair in overlapping.windows(2) {
            let (x, y) = (pair[0], pair[1]);
            if (y.0 - x.1) as f64 > max_mid_gap {
                out.push(SeqRange::new(range.name.clone(), beg, x.1 + mid_pad));
                beg = y.0 - mid_pad;
            }
        }
        if (end - last.1) as f64 > max_end_gap {
            end = last.1 + end_pad;
        }
        out.push(SeqRange::new(range.name.clone(), beg, end));
    }
    out
}

/// Per-sequence total range length, grouped by consecutive name runs.
pub fn sequence_sizes(seq_ranges: &[SeqRange]) -> Vec<(Bp, String)> {
    let mut out: Vec<(Bp, String)> = Vec::new();
    for r in seq_ranges {
        match out.last_mut() {
            Some((size, name)) if *name == r.name => *size += r.len(),
            _ => out.push((r.len(), r.name.clone())),
        }
    }
    out
}

/// Names of the `max_seqs` longest sequences; the rest are discarded with
/// a warning.
pub fn biggest_sequences(seq_ranges: &[SeqRange], max_seqs: usize) -> HashSet<String> {
    let mut sizes = sequence_sizes(seq_ranges);
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    if sizes.len() > max_seqs {
        log::warn!("too many sequences - discarding the smallest ones");
        sizes.truncate(max_seqs);
    }
    sizes.into_iter().map(|(_, name)| name).collect()
}
