//! Global sequence ordering and strand-orientation policy.
//!
//! Each axis gets an ordering mode and a strand mode, independently for
//! primary and secondary alignments. Strand choice is a coverage-weighted
//! majority vote; ordering offers natural name order, covered-length order,
//! and alignment-adjacency order (which depends on the opposite axis's
//! already-fixed order, so selecting it on both axes is a circular
//! dependency).

use std::collections::HashMap;

use anyhow::anyhow;
use thiserror::Error;

use crate::types::{Alignment, Bp, SeqRange};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("the sort options have circular dependency")]
    CircularSort,
    #[error("the strand options have circular dependency")]
    CircularStrand,
}

/// Sequence ordering mode for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Keep input order.
    Input,
    /// Natural lexical-numeric name order, e.g. chr9 before chr10.
    Name,
    /// Descending total covered length, ties in name order.
    Length,
    /// Place each sequence next to its alignment partners on the other axis.
    Alignment,
}

impl std::str::FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "0" => Ok(Self::Input),
            "1" => Ok(Self::Name),
            "2" => Ok(Self::Length),
            "3" => Ok(Self::Alignment),
            _ => Err(anyhow!("bad sort mode {:?} (expected 0-3)", text)),
        }
    }
}

/// Strand orientation mode for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandMode {
    /// Show every sequence in forward orientation.
    Forward,
    /// Orient each sequence by a majority vote over its alignments.
    Alignment,
}

impl std::str::FromStr for StrandMode {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "0" => Ok(Self::Forward),
            "1" => Ok(Self::Alignment),
            _ => Err(anyhow!("bad strand mode {:?} (expected 0-1)", text)),
        }
    }
}

/// One element of a natural sort key: digit runs compare numerically,
/// and numbers order before text as in ASCII.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalPart {
    Number(u128),
    Text(String),
}

/// Sort key for "natural" ordering, e.g. chr9 < chr10. The key alternates
/// text and number parts, beginning and ending with (possibly empty) text.
pub fn natural_sort_key(name: &str) -> Vec<NaturalPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();
    for c in name.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if !digits.is_empty() {
                parts.push(NaturalPart::Text(std::mem::take(&mut text)));
                parts.push(NaturalPart::Number(digits.parse().unwrap_or(u128::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        parts.push(NaturalPart::Text(std::mem::take(&mut text)));
        parts.push(NaturalPart::Number(digits.parse().unwrap_or(u128::MAX)));
    }
    parts.push(NaturalPart::Text(text));
    parts
}

/// Assign a strand number to every range. In alignment mode, each
/// sequence's signed aligned-letter-pair total decides: sign is flipped
/// for cross-strand alignments, and a non-negative sum means forward.
pub fn ranges_with_strand_info(
    seq_ranges: &[SeqRange],
    mode: StrandMode,
    alignments: &[Alignment],
    seq_index: usize,
) -> Vec<SeqRange> {
    if mode == StrandMode::Forward {
        return seq_ranges.to_vec();
    }
    let mut forward_minus_reverse: HashMap<&str, Bp> = HashMap::new();
    for a in alignments {
        let mut pairs = a.aligned_pairs();
        if a.is_cross_strand() {
            pairs = -pairs;
        }
        *forward_minus_reverse.entry(a.name(seq_index)).or_insert(0) += pairs;
    }
    seq_ranges
        .iter()
        .map(|r| {
            let sum = forward_minus_reverse.get(r.name.as_str()).copied().unwrap_or(0);
            let mut r = r.clone();
            r.strand_num = if sum >= 0 { 1 } else { 2 };
            r
        })
        .collect()
}

/// Group consecutive ranges of the same sequence.
fn grouped_by_name(seq_ranges: &[SeqRange]) -> Vec<Vec<SeqRange>> {
    let mut groups: Vec<Vec<SeqRange>> = Vec::new();
    for r in seq_ranges {
        match groups.last_mut() {
            Some(g) if g[0].name == r.name => g.push(r.clone()),
            _ => groups.push(vec![r.clone()]),
        }
    }
    groups
}

/// Display rank and presentation flip of each sequence on an already
/// ordered axis: reverse-chosen sequences flip sign.
fn ranks_and_flips(sorted_ranges: &[SeqRange]) -> HashMap<String, (i64, Bp)> {
    grouped_by_name(sorted_ranges)
        .iter()
        .enumerate()
        .map(|(rank, g)| {
            let flip = if g[0].strand_num < 2 { 1 } else { -1 };
            (g[0].name.clone(), (rank as i64, flip))
        })
        .collect()
}

/// For each alignment: the sequence it places, the rank and flipped
/// position of its partner on the other axis, and its aligned-pair count.
fn alignment_sort_data(
    alignments: &[Alignment],
    seq_index: usize,
    other_ranks: &HashMap<String, (i64, Bp)>,
) -> Vec<(String, i64, Bp, Bp)> {
    let other_index = 1 - seq_index;
    let mut data: Vec<(String, i64, Bp, Bp)> = alignments
        .iter()
        .filter_map(|a| {
            let &(other_rank, other_flip) = other_ranks.get(a.name(other_index))?;
            let first = &a.blocks[0];
            let last = &a.blocks[a.blocks.len() - 1];
            let (b0, bn) = if other_index == 0 {
                (first.beg1, last.beg1)
            } else {
                (first.beg2, last.beg2)
            };
            let other_pos = other_flip * (b0 + bn + last.size).abs();
            Some((
                a.name(seq_index).to_string(),
                other_rank,
                other_pos,
                a.aligned_pairs(),
            ))
        })
        .collect();
    data.sort();
    data
}

/// Placement key for alignment-adjacency order: walk a sequence's
/// alignments (sorted by partner rank and position) subtracting aligned
/// pairs until half the total is consumed, and take that alignment's
/// partner rank and position. Exact integer arithmetic throughout.
fn alignment_key(
    per_seq: &HashMap<String, Vec<(i64, Bp, Bp)>>,
    group: &[SeqRange],
) -> (i64, Bp) {
    let alns = match per_seq.get(&group[0].name) {
        Some(a) => a,
        None => return (i64::MAX, Bp::MAX),
    };
    let total: Bp = alns.iter().map(|&(_, _, pairs)| pairs).sum();
    let mut to_middle = total / 2;
    for &(rank, pos, pairs) in alns {
        to_middle -= pairs;
        if to_middle < 0 {
            return (rank, pos);
        }
    }
    (i64::MAX, Bp::MAX)
}

/// Order one axis's ranges. Reverse-chosen sequences have their ranges
/// reversed in presentation without changing the group's position.
/// `alignments` and `other_ranges` are consulted only in alignment mode;
/// `other_ranges` must already be in final order.
pub fn sorted_ranges(
    seq_ranges: &[SeqRange],
    mode: SortMode,
    seq_index: usize,
    alignments: &[Alignment],
    other_ranges: &[SeqRange],
) -> Vec<SeqRange> {
    let mut groups = grouped_by_name(seq_ranges);
    for g in &mut groups {
        if g[0].strand_num > 1 {
            g.reverse();
        }
    }
    match mode {
        SortMode::Input => {}
        SortMode::Name => {
            groups.sort_by_cached_key(|g| natural_sort_key(&g[0].name));
        }
        SortMode::Length => {
            groups.sort_by_cached_key(|g| {
                let neg_len: Bp = g.iter().map(|r| r.beg - r.end).sum();
                (neg_len, natural_sort_key(&g[0].name))
            });
        }
        SortMode::Alignment => {
            let other_ranks = ranks_and_flips(other_ranges);
            let data = alignment_sort_data(alignments, seq_index, &other_ranks);
            let mut per_seq: HashMap<String, Vec<(i64, Bp, Bp)>> = HashMap::new();
            for (name, rank, pos, pairs) in data {
                per_seq.entry(name).or_default().push((rank, pos, pairs));
            }
            groups.sort_by_cached_key(|g| alignment_key(&per_seq, g));
        }
    }
    groups.into_iter().flatten().collect()
}

/// Ordering and strand options for both axes, each as a
/// (primary, secondary) pair.
#[derive(Debug, Clone, Copy)]
pub struct OrderingOptions {
    pub sort1: (SortMode, SortMode),
    pub sort2: (SortMode, SortMode),
    pub strands1: (StrandMode, StrandMode),
    pub strands2: (StrandMode, StrandMode),
}

/// Resolve strand and order for both axes, primary and secondary ranges.
/// Fails before any layout work when either policy is circular.
#[allow(clippy::too_many_arguments)]
pub fn all_sorted_ranges(
    opts: &OrderingOptions,
    alignments: &[Alignment],
    alignments_b: &[Alignment],
    seq_ranges1: &[SeqRange],
    seq_ranges_b1: &[SeqRange],
    seq_ranges2: &[SeqRange],
    seq_ranges_b2: &[SeqRange],
) -> Result<(Vec<SeqRange>, Vec<SeqRange>), SortError> {
    let (strand1, strand_b1) = opts.strands1;
    let (strand2, strand_b2) = opts.strands2;
    if strand1 == StrandMode::Alignment && strand2 == StrandMode::Alignment {
        return Err(SortError::CircularStrand);
    }
    let ranges1 = ranges_with_strand_info(seq_ranges1, strand1, alignments, 0);
    let ranges2 = ranges_with_strand_info(seq_ranges2, strand2, alignments, 1);
    let ranges_b1 = ranges_with_strand_info(seq_ranges_b1, strand_b1, alignments_b, 0);
    let ranges_b2 = ranges_with_strand_info(seq_ranges_b2, strand_b2, alignments_b, 1);

    let (sort1, sort_b1) = opts.sort1;
    let (sort2, sort_b2) = opts.sort2;
    let (s1, s2) = match (sort1, sort2) {
        (SortMode::Alignment, SortMode::Alignment) => return Err(SortError::CircularSort),
        (SortMode::Alignment, _) => {
            let s2 = sorted_ranges(&ranges2, sort2, 1, &[], &[]);
            let s1 = sorted_ranges(&ranges1, sort1, 0, alignments, &s2);
            (s1, s2)
        }
        (_, SortMode::Alignment) => {
            let s1 = sorted_ranges(&ranges1, sort1, 0, &[], &[]);
            let s2 = sorted_ranges(&ranges2, sort2, 1, alignments, &s1);
            (s1, s2)
        }
        _ => (
            sorted_ranges(&ranges1, sort1, 0, &[], &[]),
            sorted_ranges(&ranges2, sort2, 1, &[], &[]),
        ),
    };
    let t1 = sorted_ranges(&ranges_b1, sort_b1, 0, alignments_b, &s2);
    let t2 = sorted_ranges(&ranges_b2, sort_b2, 1, alignments_b, &s1);

    let mut out1 = s1;
    out1.extend(t1);
    let mut out2 = s2;
    out2.extend(t2);
    Ok((out1, out2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Block;

    fn range(name: &str, beg: Bp, end: Bp) -> SeqRange {
        SeqRange::new(name.into(), beg, end)
    }

    #[test]
    fn test_natural_sort_order() {
        let mut names = vec!["chr2", "chr10", "chr1"];
        names.sort_by_cached_key(|n| natural_sort_key(n));
        assert_eq!(names, vec!["chr1", "chr2", "chr10"]);
    }

    #[test]
    fn test_natural_sort_mixed_suffixes() {
        let mut names = vec!["chr1b", "chr1", "chr1a2", "chr1a10"];
        names.sort_by_cached_key(|n| natural_sort_key(n));
        assert_eq!(names, vec!["chr1", "chr1a2", "chr1a10", "chr1b"]);
    }

    #[test]
    fn test_strand_vote_is_coverage_weighted() {
        let alignments = [
            Alignment::new("s".into(), "t".into(), vec![Block::new(0, 0, 30)]),
            Alignment::new("s".into(), "t".into(), vec![Block::new(-90, 40, 50)]),
        ];
        let ranges = [range("s", 0, 100)];
        let got = ranges_with_strand_info(&ranges, StrandMode::Alignment, &alignments, 0);
        // 30 forward vs 50 reverse: the reverse majority wins.
        assert_eq!(got[0].strand_num, 2);
    }

    #[test]
    fn test_length_order_with_name_ties() {
        let ranges = [
            range("b", 0, 50),
            range("c", 0, 100),
            range("a", 0, 50),
        ];
        let with_strand = ranges_with_strand_info(&ranges, StrandMode::Forward, &[], 0);
        let got = sorted_ranges(&with_strand, SortMode::Length, 0, &[], &[]);
        let names: Vec<&str> = got.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reverse_chosen_group_presented_reversed() {
        let mut first = range("s", 0, 50);
        first.strand_num = 2;
        let mut second = range("s", 60, 100);
        second.strand_num = 2;
        let got = sorted_ranges(&[first, second], SortMode::Name, 0, &[], &[]);
        assert_eq!(got[0].beg, 60);
        assert_eq!(got[1].beg, 0);
    }

    #[test]
    fn test_alignment_order_places_partners_nearby() {
        // Axis 2 order is fixed: t1 then t2. seqB aligns to t1, seqA to t2,
        // so alignment order on axis 1 is seqB before seqA.
        let alignments = [
            Alignment::new("seqA".into(), "t2".into(), vec![Block::new(0, 0, 50)]),
            Alignment::new("seqB".into(), "t1".into(), vec![Block::new(0, 0, 50)]),
        ];
        let axis1 = ranges_with_strand_info(
            &[range("seqA", 0, 100), range("seqB", 0, 100)],
            StrandMode::Forward,
            &alignments,
            0,
        );
        let axis2 = ranges_with_strand_info(
            &[range("t1", 0, 100), range("t2", 0, 100)],
            StrandMode::Forward,
            &alignments,
            1,
        );
        let got = sorted_ranges(&axis1, SortMode::Alignment, 0, &alignments, &axis2);
        let names: Vec<&str> = got.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["seqB", "seqA"]);
    }

    #[test]
    fn test_circular_dependencies_rejected() {
        let opts = OrderingOptions {
            sort1: (SortMode::Alignment, SortMode::Name),
            sort2: (SortMode::Alignment, SortMode::Name),
            strands1: (StrandMode::Forward, StrandMode::Forward),
            strands2: (StrandMode::Forward, StrandMode::Forward),
        };
        let got = all_sorted_ranges(&opts, &[], &[], &[], &[], &[], &[]);
        assert_eq!(got.unwrap_err(), SortError::CircularSort);

        let opts = OrderingOptions {
            sort1: (SortMode::Name, SortMode::Name),
            sort2: (SortMode::Name, SortMode::Name),
            strands1: (StrandMode::Alignment, StrandMode::Forward),
            strands2: (StrandMode::Alignment, StrandMode::Forward),
        };
        let got = all_sorted_ranges(&opts, &[], &[], &[], &[], &[], &[]);
        assert_eq!(got.unwrap_err(), SortError::CircularStrand);
    }
}
