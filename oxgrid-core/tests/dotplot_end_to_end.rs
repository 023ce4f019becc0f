use std::io::Write;

use tempfile::NamedTempFile;

use oxgrid_core::cover::GapLimits;
use oxgrid_core::io::open_alignment_file;
use oxgrid_core::{
    read_alignment_groups, render_group, OrderingOptions, PlotOptions, SortMode, StrandMode,
};

fn write_alignments(lines: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp alignments");
    for l in lines {
        writeln!(f, "{}", l).unwrap();
    }
    f
}

fn options() -> PlotOptions {
    let gap: GapLimits = "1,4".parse().unwrap();
    PlotOptions {
        width: 100,
        height: 100,
        max_seqs: 100,
        border_pixels: 1,
        pad: 0.04,
        max_gap1: (gap, gap),
        max_gap2: (gap, gap),
        ordering: OrderingOptions {
            sort1: (SortMode::Name, SortMode::Name),
            sort2: (SortMode::Name, SortMode::Name),
            strands1: (StrandMode::Forward, StrandMode::Forward),
            strands2: (StrandMode::Forward, StrandMode::Forward),
        },
    }
}

#[test]
fn forward_and_reverse_diagonals() {
    // LAST tabular: one forward and one reverse alignment of the same pair.
    let f = write_alignments(&[
        "100 qry 0 100 + 100 tgt 0 100 + 100 100",
        "100 qry 0 100 + 100 tgt 0 100 - 100 100",
    ]);
    let reader = open_alignment_file(f.path()).expect("open alignments");
    let mut groups = read_alignment_groups(reader, &[], &[]).expect("read alignments");
    assert_eq!(groups.len(), 1);

    let im = render_group(groups.pop().unwrap(), &options(), None, &[], &[]).expect("render");
    assert_eq!(im.bp_per_pix, 1);
    assert_eq!(im.grid.width, 100);
    assert_eq!(im.grid.height, 100);
    for i in 0..100 {
        // Forward alignment on the main diagonal, reverse on the anti-diagonal.
        assert_eq!(im.grid.at(i, i) & 1, 1, "forward bit at {}", i);
        assert_eq!(im.grid.at(i, 99 - i) & 2, 2, "reverse bit at {}", i);
    }
    // The diagonals of an even-sided grid never share a pixel.
    let marked = im.grid.cells.iter().filter(|&&c| c != 0).count();
    assert_eq!(marked, 200);
}

#[test]
fn maf_input_draws_the_same_plot_as_tab() {
    let tab = write_alignments(&["30 tgt 0 30 + 100 qry 0 30 + 100 30"]);
    let maf = write_alignments(&[
        "a score=30",
        &format!("s tgt 0 30 + 100 {}", "A".repeat(30)),
        &format!("s qry 0 30 + 100 {}", "A".repeat(30)),
    ]);
    let mut images = Vec::new();
    for f in [tab, maf] {
        let reader = open_alignment_file(f.path()).expect("open alignments");
        let mut groups = read_alignment_groups(reader, &[], &[]).expect("read alignments");
        images.push(render_group(groups.pop().unwrap(), &options(), None, &[], &[]).unwrap());
    }
    assert_eq!(images[0].grid.cells, images[1].grid.cells);
}

#[test]
fn one_image_per_run_of_second_axis_sequence() {
    let f = write_alignments(&[
        "50 q 0 50 + 50 t1 0 50 + 100 50",
        "50 q 0 50 + 50 t2 0 50 + 100 50",
        "50 q 0 50 + 50 t1 50 50 + 100 50",
    ]);
    let reader = open_alignment_file(f.path()).expect("open alignments");
    let groups = read_alignment_groups(reader, &[], &[]).expect("read alignments");
    // t1, t2, t1 again: three runs, three images.
    assert_eq!(groups.len(), 3);
    for g in &groups {
        assert_eq!(g.alignments.len(), 1);
    }
}

#[test]
fn sequence_selection_narrows_the_plot() {
    let f = write_alignments(&[
        "50 qa 0 50 + 50 t 0 50 + 200 50",
        "50 qb 0 50 + 50 t 100 50 + 200 50",
    ]);
    let reader = open_alignment_file(f.path()).expect("open alignments");
    let requests = vec![oxgrid_core::SeqRequest::parse("qa").unwrap()];
    let mut groups = read_alignment_groups(reader, &requests, &[]).expect("read alignments");
    assert_eq!(groups.len(), 1);
    let g = groups.pop().unwrap();
    assert_eq!(g.alignments.len(), 1);

    let im = render_group(g, &options(), None, &[], &[]).expect("render");
    // Only qa vs the aligned part of t survives trimming.
    assert_eq!(im.range_pix_begs1.len(), 1);
    assert_eq!(im.range_pix_begs2.len(), 1);
}
