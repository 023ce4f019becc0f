//! Ingestion: streams alignment records, applies sequence selection and
//! cropping, accumulates per-axis coverage, and splits the input into plot
//! groups. A group is a run of input sharing the same second-axis sequence;
//! each group becomes one image.
//!
//! Later stages need global knowledge (total coverage, all sequence names),
//! so each group is fully materialized here.

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::Result;

use crate::cover::{cropped_blocks, CoverContext};
use crate::io::{AlignmentReader, AlignmentRecord};
use crate::select::{base_name, ranges_from_seq_name, SeqRequest};
use crate::types::{Alignment, Block, Bp, SeqRange};

/// One plot group: its alignments plus the per-axis display ranges and
/// coverage accumulated while reading.
#[derive(Debug, Default)]
pub struct GroupInput {
    pub alignments: Vec<Alignment>,
    pub axis1: CoverContext,
    pub axis2: CoverContext,
}

impl GroupInput {
    fn push(
        &mut self,
        record: &AlignmentRecord,
        blocks: Vec<Block>,
        ranges1: &[(Bp, Bp)],
        ranges2: &[(Bp, Bp)],
    ) {
        let covered1 = (blocks[0].beg1, blocks[blocks.len() - 1].end1());
        let covered2 = (blocks[0].beg2, blocks[blocks.len() - 1].end2());
        self.axis1.update(&record.seq_name1, ranges1, covered1);
        self.axis2.update(&record.seq_name2, ranges2, covered2);
        self.alignments.push(Alignment::new(
            record.seq_name1.clone(),
            record.seq_name2.clone(),
            blocks,
        ));
    }
}

/// Read primary alignments, grouped by runs of the second-axis sequence.
/// The final group is always emitted, even when nothing survived filtering
/// (the pipeline reports that as an empty-input error).
pub fn read_alignment_groups<R: BufRead>(
    reader: R,
    requests1: &[SeqRequest],
    requests2: &[SeqRequest],
) -> Result<Vec<GroupInput>> {
    let mut groups = Vec::new();
    let mut group = GroupInput::default();
    let mut split_by: Option<String> = None;

    for record in AlignmentReader::new(reader) {
        let record = record?;
        match &split_by {
            None => split_by = Some(record.seq_name2.clone()),
            Some(name) if *name != record.seq_name2 => {
                groups.push(std::mem::take(&mut group));
                split_by = Some(record.seq_name2.clone());
            }
            _ => {}
        }
        let ranges1 = ranges_from_seq_name(requests1, &record.seq_name1, record.seq_len1);
        if ranges1.is_empty() {
            continue;
        }
        let ranges2 = ranges_from_seq_name(requests2, &record.seq_name2, record.seq_len2);
        if ranges2.is_empty() {
            continue;
        }
        let blocks = cropped_blocks(&record.blocks, &ranges1, &ranges2);
        if blocks.is_empty() {
            continue;
        }
        group.push(&record, blocks, &ranges1, &ranges2);
    }
    groups.push(group);
    Ok(groups)
}

fn crop_dict(ranges: &[SeqRange]) -> HashMap<String, Vec<(Bp, Bp)>> {
    let mut dict: HashMap<String, Vec<(Bp, Bp)>> = HashMap::new();
    for r in ranges {
        dict.entry(r.name.clone()).or_default().push((r.beg, r.end));
    }
    dict
}

/// Look up a sequence's display ranges by full name, then by post-dot base
/// name (renaming the sequence to the matching key).
fn name_and_ranges(
    dict: &HashMap<String, Vec<(Bp, Bp)>>,
    name: &str,
) -> (String, Vec<(Bp, Bp)>) {
    if let Some(ranges) = dict.get(name) {
        return (name.to_string(), ranges.clone());
    }
    let base = base_name(name);
    if let Some(ranges) = dict.get(base) {
        return (base.to_string(), ranges.clone());
    }
    (name.to_string(), Vec::new())
}

/// Read secondary alignments, cropped to the primary pass's trimmed ranges.
/// A sequence absent from the primary plot on one axis falls back to its
/// full length there and contributes its own ranges and coverage.
pub fn read_secondary_alignments<R: BufRead>(
    reader: R,
    crop_ranges1: &[SeqRange],
    crop_ranges2: &[SeqRange],
) -> Result<GroupInput> {
    let dict1 = crop_dict(crop_ranges1);
    let dict2 = crop_dict(crop_ranges2);

    let mut group = GroupInput::default();
    for record in AlignmentReader::new(reader) {
        let mut record = record?;
        let (name1, ranges1) = name_and_ranges(&dict1, &record.seq_name1);
        let (name2, ranges2) = name_and_ranges(&dict2, &record.seq_name2);
        if ranges1.is_empty() && ranges2.is_empty() {
            continue;
        }
        record.seq_name1 = name1;
        record.seq_name2 = name2;
        let full1 = vec![(0, record.seq_len1)];
        let full2 = vec![(0, record.seq_len2)];
        let r1 = if ranges1.is_empty() { &full1 } else { &ranges1 };
        let r2 = if ranges2.is_empty() { &full2 } else { &ranges2 };

        let blocks = cropped_blocks(&record.blocks, r1, r2);
        if blocks.is_empty() {
            continue;
        }
        let covered1 = (blocks[0].beg1, blocks[blocks.len() - 1].end1());
        let covered2 = (blocks[0].beg2, blocks[blocks.len() - 1].end2());
        // Only sequences outside the primary plot get new ranges/coverage.
        if ranges1.is_empty() {
            group.axis1.update(&record.seq_name1, r1, covered1);
        }
        if ranges2.is_empty() {
            group.axis2.update(&record.seq_name2, r2, covered2);
        }
        group.alignments.push(Alignment::new(
            record.seq_name1.clone(),
            record.seq_name2.clone(),
            blocks,
        ));
    }
    Ok(group)
}

/// Drop ranges whose sequence no longer appears in any alignment on the
/// given axis.
pub fn remaining_sequence_ranges(
    seq_ranges: &[SeqRange],
    alignments: &[Alignment],
    seq_index: usize,
) -> Vec<SeqRange> {
    let remaining: std::collections::HashSet<&str> =
        alignments.iter().map(|a| a.name(seq_index)).collect();
    seq_ranges
        .iter()
        .filter(|r| remaining.contains(r.name.as_str()))
        .cloned()
        .collect()
}
