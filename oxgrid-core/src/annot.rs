//! Annotation stripes: colored boxes spanning the full thickness of one
//! axis, drawn under the alignment dots. Each annotation interval is mapped
//! through the same range-and-origin layout as the alignments.

use crate::layout::{div_ceil, RangeDict};
use crate::types::Bp;

/// One annotation interval on a sequence, already reduced to a drawing
/// layer and color. Lower layers are drawn first.
#[derive(Debug, Clone, PartialEq)]
pub struct Annot {
    pub layer: f64,
    pub color: String,
    pub seq_name: String,
    pub beg: Bp,
    pub end: Bp,
}

/// An annotation box in pixel coordinates along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotBox {
    pub layer: f64,
    pub color: String,
    /// Top-edge annotation (axis 1, a column stripe) or left-edge (axis 2).
    pub is_top: bool,
    pub pix_beg: Bp,
    pub pix_end: Bp,
}

/// Allow lookup by post-dot base names, e.g. chr7 as well as hg19.chr7.
/// If any base name is ambiguous, give up and return the original mapping.
pub fn expanded_seq_dict(dict: &RangeDict) -> RangeDict {
    let mut new_dict = dict.clone();
    for (name, ranges) in dict {
        if let Some((_, base)) = name.split_once('.') {
            if new_dict.contains_key(base) {
                return dict.clone();
            }
            new_dict.insert(base.to_string(), ranges.clone());
        }
    }
    new_dict
}

/// Map annotations onto one axis's pixels. High layers (> 10000, assembly
/// gaps) only claim fully-covered pixels, except at range ends; everything
/// else claims every partly-covered pixel.
pub fn annotation_boxes(
    annots: &[Annot],
    range_dict: &RangeDict,
    is_top: bool,
    bp_per_pix: Bp,
) -> Vec<AnnotBox> {
    let mut boxes = Vec::new();
    for a in annots {
        let ranges = match range_dict.get(&a.seq_name) {
            Some(r) => r,
            None => continue,
        };
        for r in ranges {
            let mut beg = a.beg.max(r.beg);
            let mut end = a.end.min(r.end);
            if beg >= end {
                continue;
            }
            if r.is_reverse {
                (beg, end) = (-end, -beg);
            }
            let (pix_beg, pix_end) = if a.layer <= 10000.0 {
                (
                    (r.origin + beg).div_euclid(bp_per_pix),
                    div_ceil(r.origin + end, bp_per_pix),
                )
            } else {
                let mut pix_beg = div_ceil(r.origin + beg, bp_per_pix);
                let mut pix_end = (r.origin + end).div_euclid(bp_per_pix);
                if pix_end <= pix_beg {
                    continue;
                }
                if a.end >= r.end {
                    // A gap reaching the range end keeps its partial pixel.
                    if r.is_reverse {
                        pix_beg = (r.origin + beg).div_euclid(bp_per_pix);
                    } else {
                        pix_end = div_ceil(r.origin + end, bp_per_pix);
                    }
                }
                (pix_beg, pix_end)
            };
            boxes.push(AnnotBox {
                layer: a.layer,
                color: a.color.clone(),
                is_top,
                pix_beg,
                pix_end,
            });
        }
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrientedRange;

    fn dict(name: &str, ranges: Vec<OrientedRange>) -> RangeDict {
        let mut d = RangeDict::new();
        d.insert(name.to_string(), ranges);
        d
    }

    fn forward(beg: Bp, end: Bp, origin: Bp) -> OrientedRange {
        OrientedRange {
            beg,
            end,
            is_reverse: false,
            origin,
        }
    }

    fn annot(layer: f64, seq: &str, beg: Bp, end: Bp) -> Annot {
        Annot {
            layer,
            color: "#fbf".into(),
            seq_name: seq.into(),
            beg,
            end,
        }
    }

    #[test]
    fn test_low_layer_includes_partial_pixels() {
        let d = dict("s", vec![forward(0, 100, 0)]);
        let got = annotation_boxes(&[annot(900.0, "s", 5, 15)], &d, true, 10);
        assert_eq!(got.len(), 1);
        assert_eq!((got[0].pix_beg, got[0].pix_end), (0, 2));
    }

    #[test]
    fn test_high_layer_excludes_partial_pixels() {
        let d = dict("s", vec![forward(0, 100, 0)]);
        let got = annotation_boxes(&[annot(20000.0, "s", 5, 25)], &d, true, 10);
        assert_eq!((got[0].pix_beg, got[0].pix_end), (1, 2));
        // Too narrow to own any full pixel: dropped.
        let got = annotation_boxes(&[annot(20000.0, "s", 5, 8)], &d, true, 10);
        assert!(got.is_empty());
    }

    #[test]
    fn test_high_layer_keeps_partial_pixel_at_range_end() {
        let d = dict("s", vec![forward(0, 95, 0)]);
        let got = annotation_boxes(&[annot(20000.0, "s", 75, 95)], &d, true, 10);
        assert_eq!((got[0].pix_beg, got[0].pix_end), (8, 10));
    }

    #[test]
    fn test_reverse_range_flips_interval() {
        // Reversed range 0..100 with origin past its pixel end.
        let d = dict(
            "s",
            vec![OrientedRange {
                beg: 0,
                end: 100,
                is_reverse: true,
                origin: 100,
            }],
        );
        let got = annotation_boxes(&[annot(900.0, "s", 0, 10)], &d, true, 10);
        // Positions 0..10 display at the far end of the 10-pixel range.
        assert_eq!((got[0].pix_beg, got[0].pix_end), (9, 10));
    }

    #[test]
    fn test_unknown_sequence_skipped() {
        let d = dict("s", vec![forward(0, 100, 0)]);
        assert!(annotation_boxes(&[annot(900.0, "x", 0, 10)], &d, true, 10).is_empty());
    }

    #[test]
    fn test_expanded_seq_dict_adds_base_names() {
        let d = dict("hg19.chr7", vec![forward(0, 100, 0)]);
        let e = expanded_seq_dict(&d);
        assert!(e.contains_key("chr7"));
        assert!(e.contains_key("hg19.chr7"));
    }

    #[test]
    fn test_expanded_seq_dict_gives_up_on_ambiguity() {
        let mut d = dict("hg19.chr7", vec![forward(0, 100, 0)]);
        d.insert("chr7".into(), vec![forward(0, 50, 0)]);
        let e = expanded_seq_dict(&d);
        assert_eq!(e.len(), 2);
        assert_eq!(e["chr7"][0].end, 50);
    }
}
