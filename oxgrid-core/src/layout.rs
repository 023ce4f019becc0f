//! Pixel layout of one axis: the shared base-pairs-per-pixel scale, each
//! range's pixel extent and start, and the coordinate origin that maps
//! sequence positions onto the pixel row or column.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Bp, OrientedRange, SeqRange};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("can't fit the image: too many sequences?")]
    ImageTooSmall,
}

/// Oriented display ranges per sequence, each with its pixel-space origin.
pub type RangeDict = HashMap<String, Vec<OrientedRange>>;

/// x / y rounded toward negative infinity (y may be negative).
fn floor_div(x: Bp, y: Bp) -> Bp {
    let q = x / y;
    if x % y != 0 && (x < 0) != (y < 0) {
        q - 1
    } else {
        q
    }
}

/// x / y rounded up, for positive y.
pub fn div_ceil(x: Bp, y: Bp) -> Bp {
    x.div_euclid(y) + Bp::from(x.rem_euclid(y) != 0)
}

/// The minimum bp-per-pixel that fits every range plus the borders between
/// them into `max_pixels`. Starts from the total-length lower bound and
/// scans upward until the sum of per-range rounded-up pixel lengths fits.
pub fn bp_per_pix(
    range_sizes: &[Bp],
    pix_tween_ranges: Bp,
    max_pixels: Bp,
) -> Result<Bp, LayoutError> {
    log::info!("choosing bp per pixel...");
    let num_of_ranges = range_sizes.len() as Bp;
    let max_pixels_in_ranges = max_pixels - pix_tween_ranges * (num_of_ranges - 1);
    if num_of_ranges == 0 || max_pixels_in_ranges < num_of_ranges {
        return Err(LayoutError::ImageTooSmall);
    }
    // Work with negated values so that floor division rounds up.
    let neg_limit = -max_pixels_in_ranges;
    let total: Bp = range_sizes.iter().sum();
    let mut neg_bp_per_pix = floor_div(total, neg_limit);
    loop {
        let neg_pix: Bp = range_sizes.iter().map(|&i| floor_div(i, neg_bp_per_pix)).sum();
        if neg_pix >= neg_limit {
            return Ok(-neg_bp_per_pix);
        }
        neg_bp_per_pix -= 1;
    }
}

/// Pixel extents of one axis's ranges, in display order.
#[derive(Debug, Clone)]
pub struct PixelLayout {
    pub range_pix_begs: Vec<Bp>,
    pub range_pix_lens: Vec<Bp>,
    pub total_pix: Bp,
}

fn range_pix_begs(range_pix_lens: &[Bp], pix_tween_ranges: Bp, margin: Bp) -> Vec<Bp> {
    let mut begs = Vec::with_capacity(range_pix_lens.len());
    let mut pix_tot = margin - pix_tween_ranges;
    for &len in range_pix_lens {
        pix_tot += pix_tween_ranges;
        begs.push(pix_tot);
        pix_tot += len;
    }
    begs
}

/// Lay out one axis at the given scale, starting after `margin` pixels.
pub fn pixel_data(
    range_sizes: &[Bp],
    bp_per_pix: Bp,
    pix_tween_ranges: Bp,
    margin: Bp,
) -> PixelLayout {
    let range_pix_lens: Vec<Bp> = range_sizes.iter().map(|&i| div_ceil(i, bp_per_pix)).collect();
    let range_pix_begs = range_pix_begs(&range_pix_lens, pix_tween_ranges, margin);
    let total_pix = match (range_pix_begs.last(), range_pix_lens.last()) {
        (Some(&b), Some(&l)) => b + l,
        _ => margin,
    };
    PixelLayout {
        range_pix_begs,
        range_pix_lens,
        total_pix,
    }
}

/// Attach a pixel-space origin to each sorted range. For a reversed range
/// the origin is past its pixel end, so increasing sequence position moves
/// left/up; for a forward range it is the pixel start minus the range
/// begin.
fn ranges_with_origins<'a>(
    sorted_ranges: &'a [SeqRange],
    layout: &'a PixelLayout,
    bp_per_pix: Bp,
) -> impl Iterator<Item = (&'a str, OrientedRange)> + 'a {
    sorted_ranges
        .iter()
        .zip(layout.range_pix_begs.iter().zip(&layout.range_pix_lens))
        .map(move |(r, (&pix_beg, &pix_len))| {
            let is_reverse = r.strand_num > 1;
            let origin = if is_reverse {
                bp_per_pix * (pix_beg + pix_len) + r.beg
            } else {
                bp_per_pix * pix_beg - r.beg
            };
            (
                r.name.as_str(),
                OrientedRange {
                    beg: r.beg,
                    end: r.end,
                    is_reverse,
                    origin,
                },
            )
        })
}

/// Group oriented ranges by sequence, each group sorted by position.
pub fn ranges_and_origins_per_seq(
    sorted_ranges: &[SeqRange],
    layout: &PixelLayout,
    bp_per_pix: Bp,
) -> RangeDict {
    let mut dict = RangeDict::new();
    for (name, oriented) in ranges_with_origins(sorted_ranges, layout, bp_per_pix) {
        dict.entry(name.to_string()).or_default().push(oriented);
    }
    for ranges in dict.values_mut() {
        ranges.sort();
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_div_matches_mathematical_floor() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(5, -100), -1);
        assert_eq!(floor_div(6, -2), -3);
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(10, 3), 4);
        assert_eq!(div_ceil(9, 3), 3);
        assert_eq!(div_ceil(0, 3), 0);
    }

    #[test]
    fn test_bp_per_pix_exact_fit() {
        // 100 bases in up to 100 pixels: 1 bp per pixel.
        assert_eq!(bp_per_pix(&[100], 1, 100), Ok(1));
        // Halving the pixels doubles the scale.
        assert_eq!(bp_per_pix(&[100], 1, 50), Ok(2));
    }

    #[test]
    fn test_bp_per_pix_rounding_per_range() {
        // Per-range round-up matters: the total-length lower bound (26)
        // happens to fit, 2 pixels per range plus 1 border.
        let got = bp_per_pix(&[51, 51], 1, 5).unwrap();
        assert_eq!(got, 26);
        let pix: Bp = [51, 51].iter().map(|&i| div_ceil(i, got)).sum();
        assert!(pix + 1 <= 5);
    }

    #[test]
    fn test_bp_per_pix_too_many_sequences() {
        let sizes = vec![10; 60];
        assert_eq!(bp_per_pix(&sizes, 1, 100), Err(LayoutError::ImageTooSmall));
        assert_eq!(bp_per_pix(&[], 1, 100), Err(LayoutError::ImageTooSmall));
    }

    #[test]
    fn test_pixel_data_places_borders_between_ranges() {
        let p = pixel_data(&[100, 50], 2, 3, 0);
        assert_eq!(p.range_pix_lens, vec![50, 25]);
        assert_eq!(p.range_pix_begs, vec![0, 53]);
        assert_eq!(p.total_pix, 78);
    }

    #[test]
    fn test_origins_forward_and_reverse() {
        let mut fwd = SeqRange::new("f".into(), 10, 110);
        fwd.strand_num = 1;
        let mut rev = SeqRange::new("r".into(), 0, 100);
        rev.strand_num = 2;
        let layout = pixel_data(&[100, 100], 2, 0, 0);
        let dict = ranges_and_origins_per_seq(&[fwd, rev], &layout, 2);

        let f = &dict["f"][0];
        assert!(!f.is_reverse);
        // Pixel of position `beg` is (origin + beg) / bp_per_pix = pix_beg.
        assert_eq!((f.origin + f.beg) / 2, 0);

        let r = &dict["r"][0];
        assert!(r.is_reverse);
        assert_eq!(r.origin, 2 * (50 + 50) + 0);
    }
}
