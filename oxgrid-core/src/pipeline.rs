//! Per-group plotting pipeline: merge coverage, trim unaligned stretches,
//! cap the sequence count, fold in secondary alignments, order both axes,
//! choose the pixel scale, and rasterize.

use std::path::Path;

use thiserror::Error;

use crate::annot::{annotation_boxes, expanded_seq_dict, Annot, AnnotBox};
use crate::cover::{biggest_sequences, covered_length, trimmed, GapLimits};
use crate::ingest::{read_secondary_alignments, remaining_sequence_ranges, GroupInput};
use crate::io::open_alignment_file;
use crate::layout::{bp_per_pix, pixel_data, ranges_and_origins_per_seq, LayoutError};
use crate::raster::{alignment_pixels, HitGrid};
use crate::sort::{all_sorted_ranges, OrderingOptions, SortError};
use crate::types::{Bp, SeqRange};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("there are no alignments")]
    NoAlignments,
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Knobs shared by every group of one plotting run.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Maximum width in pixels.
    pub width: Bp,
    /// Maximum height in pixels.
    pub height: Bp,
    /// Maximum number of sequences per axis.
    pub max_seqs: usize,
    /// Pixels between adjacent sequences.
    pub border_pixels: Bp,
    /// Pad length when cutting unaligned gaps, as a fraction of the
    /// aligned length.
    pub pad: f64,
    /// (primary, secondary) gap tolerance per axis.
    pub max_gap1: (GapLimits, GapLimits),
    pub max_gap2: (GapLimits, GapLimits),
    pub ordering: OrderingOptions,
}

/// One finished dotplot, ready for a renderer: the hit grid, the pixel
/// start of each range on both axes (for borders), annotation boxes in
/// drawing order, and the scale.
#[derive(Debug)]
pub struct GridImage {
    pub grid: HitGrid,
    pub range_pix_begs1: Vec<Bp>,
    pub range_pix_begs2: Vec<Bp>,
    pub boxes: Vec<AnnotBox>,
    pub bp_per_pix: Bp,
}

fn log_sorted_ranges(sorted_ranges: &[SeqRange]) {
    for r in sorted_ranges {
        let mut out = format!("{}\t{}\t{}", r.name, r.beg, r.end);
        if r.strand_num > 0 {
            out.push('\t');
            out.push([b'.', b'+', b'-'][r.strand_num as usize] as char);
        }
        log::info!("{}", out);
    }
    log::info!("");
}

fn range_sizes(sorted_ranges: &[SeqRange]) -> Vec<Bp> {
    sorted_ranges.iter().map(|r| r.end - r.beg).collect()
}

/// Render one plot group. Secondary alignments are re-read per group,
/// cropped to the group's trimmed primary ranges.
pub fn render_group(
    group: GroupInput,
    opts: &PlotOptions,
    secondary_path: Option<&Path>,
    annots1: &[Annot],
    annots2: &[Annot],
) -> Result<GridImage, PlotError> {
    let GroupInput {
        mut alignments,
        axis1,
        axis2,
    } = group;
    if alignments.is_empty() {
        return Err(PlotError::NoAlignments);
    }

    log::info!("cutting...");
    let cover1 = axis1.merged();
    let cover2 = axis2.merged();
    let min_aligned_bases = covered_length(&cover1).min(covered_length(&cover2));
    let pad = (opts.pad * min_aligned_bases as f64) as Bp;
    let (gap1, gap_b1) = opts.max_gap1;
    let (gap2, gap_b2) = opts.max_gap2;
    let mut cut1 = trimmed(&axis1.seq_ranges, &cover1, min_aligned_bases, gap1, pad, pad);
    let mut cut2 = trimmed(&axis2.seq_ranges, &cover2, min_aligned_bases, gap2, pad, pad);

    let biggest1 = biggest_sequences(&cut1, opts.max_seqs);
    cut1.retain(|r| biggest1.contains(&r.name));
    alignments.retain(|a| biggest1.contains(&a.seq1));
    cut2 = remaining_sequence_ranges(&cut2, &alignments, 1);

    let biggest2 = biggest_sequences(&cut2, opts.max_seqs);
    cut2.retain(|r| biggest2.contains(&r.name));
    alignments.retain(|a| biggest2.contains(&a.seq2));
    cut1 = remaining_sequence_ranges(&cut1, &alignments, 0);

    let group_b = match secondary_path {
        Some(path) => {
            log::info!("reading secondary alignments...");
            let reader = open_alignment_file(path)?;
            read_secondary_alignments(reader, &cut1, &cut2)?
        }
        None => GroupInput::default(),
    };
    log::info!("cutting...");
    let cover_b1 = group_b.axis1.merged();
    let cover_b2 = group_b.axis2.merged();
    let cut_b1 = trimmed(&group_b.axis1.seq_ranges, &cover_b1, min_aligned_bases, gap_b1, 0, 0);
    let cut_b2 = trimmed(&group_b.axis2.seq_ranges, &cover_b2, min_aligned_bases, gap_b2, 0, 0);
    let alignments_b = group_b.alignments;

    log::info!("sorting...");
    let (sorted1, sorted2) = all_sorted_ranges(
        &opts.ordering,
        &alignments,
        &alignments_b,
        &cut1,
        &cut_b1,
        &cut2,
        &cut_b2,
    )?;
    log_sorted_ranges(&sorted1);
    log_sorted_ranges(&sorted2);

    let sizes1 = range_sizes(&sorted1);
    let sizes2 = range_sizes(&sorted2);
    let bp_per_pix1 = bp_per_pix(&sizes1, opts.border_pixels, opts.width)?;
    let bp_per_pix2 = bp_per_pix(&sizes2, opts.border_pixels, opts.height)?;
    let scale = bp_per_pix1.max(bp_per_pix2);
    log::info!("bp per pixel = {}", scale);

    let layout1 = pixel_data(&sizes1, scale, opts.border_pixels, 0);
    let width = layout1.total_pix;
    let range_dict1 = ranges_and_origins_per_seq(&sorted1, &layout1, scale);

    let layout2 = pixel_data(&sizes2, scale, opts.border_pixels, 0);
    let height = layout2.total_pix;
    let range_dict2 = ranges_and_origins_per_seq(&sorted2, &layout2, scale);

    log::info!("width:  {}", width);
    log::info!("height: {}", height);

    log::info!("processing alignments...");
    let mut all_alignments = alignments;
    all_alignments.extend(alignments_b);
    let grid = alignment_pixels(
        width as usize,
        height as usize,
        &all_alignments,
        scale,
        &range_dict1,
        &range_dict2,
    );

    let range_dict1 = expanded_seq_dict(&range_dict1);
    let range_dict2 = expanded_seq_dict(&range_dict2);
    let mut boxes = annotation_boxes(annots1, &range_dict1, true, scale);
    boxes.extend(annotation_boxes(annots2, &range_dict2, false, scale));
    boxes.sort_by(|a, b| a.layer.total_cmp(&b.layer));

    Ok(GridImage {
        grid,
        range_pix_begs1: layout1.range_pix_begs,
        range_pix_begs2: layout2.range_pix_begs,
        boxes,
        bp_per_pix: scale,
    })
}
