//! Rasterization of alignment blocks into a per-pixel hit grid. Each cell
//! holds a 2-bit mask: bit 1 for forward-diagonal coverage, bit 2 for
//! reverse-diagonal, so overlaps are distinguishable from either alone.

use crate::types::{Alignment, Bp, OrientedRange};

use crate::layout::RangeDict;

/// The dotplot bitmap: `width * height` cells of 0..=3.
#[derive(Debug)]
pub struct HitGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u8>,
}

impl HitGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }
}

/// Locate the display range holding an alignment's start on one axis, and
/// whether the alignment runs against that range's display direction.
/// Returns None when the position falls outside every range (possible only
/// if cropping and rasterization disagree).
fn strand_and_origin(ranges: &[OrientedRange], beg: Bp, size: Bp) -> Option<(bool, Bp)> {
    let is_reverse_strand = beg < 0;
    let beg = if is_reverse_strand { -(beg + size) } else { beg };
    ranges
        .iter()
        .find(|r| r.end > beg)
        .map(|r| (is_reverse_strand != r.is_reverse, r.origin))
}

/// Step a forward diagonal one pixel at a time: both coordinates increase,
/// and each step advances to whichever axis's pixel boundary comes first.
fn draw_line_forward(
    grid: &mut HitGrid,
    bp_per_pix: Bp,
    mut beg1: Bp,
    mut beg2: Bp,
    mut size: Bp,
) {
    loop {
        let q1 = beg1.div_euclid(bp_per_pix);
        let r1 = beg1.rem_euclid(bp_per_pix);
        let q2 = beg2.div_euclid(bp_per_pix);
        let r2 = beg2.rem_euclid(bp_per_pix);
        grid.cells[q2 as usize * grid.width + q1 as usize] |= 1;
        let next_pix = (bp_per_pix - r1).min(bp_per_pix - r2);
        if next_pix >= size {
            break;
        }
        beg1 += next_pix;
        beg2 += next_pix;
        size -= next_pix;
    }
}

/// Step a reverse diagonal: axis 1 increases while axis 2 decreases.
fn draw_line_reverse(
    grid: &mut HitGrid,
    bp_per_pix: Bp,
    mut beg1: Bp,
    mut beg2: Bp,
    mut size: Bp,
) {
    loop {
        let q1 = beg1.div_euclid(bp_per_pix);
        let r1 = beg1.rem_euclid(bp_per_pix);
        let q2 = beg2.div_euclid(bp_per_pix);
        let r2 = beg2.rem_euclid(bp_per_pix);
        grid.cells[q2 as usize * grid.width + q1 as usize] |= 2;
        let next_pix = (bp_per_pix - r1).min(r2 + 1);
        if next_pix >= size {
            break;
        }
        beg1 += next_pix;
        beg2 -= next_pix;
        size -= next_pix;
    }
}

/// Rasterize every alignment into a fresh hit grid. Each alignment's
/// orientation relative to both display directions is decided once, from
/// its first block, then every block is drawn as one diagonal run.
pub fn alignment_pixels(
    width: usize,
    height: usize,
    alignments: &[Alignment],
    bp_per_pix: Bp,
    range_dict1: &RangeDict,
    range_dict2: &RangeDict,
) -> HitGrid {
    let mut grid = HitGrid::new(width, height);
    for a in alignments {
        let head = &a.blocks[0];
        let placed1 = range_dict1
            .get(&a.seq1)
            .and_then(|r| strand_and_origin(r, head.beg1, head.size));
        let placed2 = range_dict2
            .get(&a.seq2)
            .and_then(|r| strand_and_origin(r, head.beg2, head.size));
        let ((is_reverse1, ori1), (is_reverse2, ori2)) = match (placed1, placed2) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => continue,
        };
        for b in &a.blocks {
            let (mut beg1, mut beg2) = (b.beg1, b.beg2);
            if is_reverse1 {
                beg1 = -(beg1 + b.size);
                beg2 = -(beg2 + b.size);
            }
            if is_reverse1 == is_reverse2 {
                draw_line_forward(&mut grid, bp_per_pix, ori1 + beg1, ori2 + beg2, b.size);
            } else {
                draw_line_reverse(&mut grid, bp_per_pix, ori1 + beg1, ori2 - beg2 - 1, b.size);
            }
        }
    }
    grid
}
