use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use oxgrid_core::cover::GapLimits;
use oxgrid_core::io::open_alignment_file;
use oxgrid_core::{
    read_alignment_groups, render_group, OrderingOptions, PlotOptions, SeqRequest,
};

mod annots;
mod color;
mod render;

#[derive(Parser)]
#[command(name = "oxgrid")]
#[command(about = "Draw a dotplot of pair-wise sequence alignments")]
#[command(version)]
struct Cli {
    /// Alignments in MAF, PSL, LAST tabular, or segment format (may be gzipped)
    alignments: PathBuf,

    /// Output image prefix: images are written as PREFIX1.png, PREFIX2.png, ...
    #[arg(short, long, default_value = "dotplot")]
    output: String,

    /// Show progress messages & data about the plot
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum width in pixels
    #[arg(short = 'x', long, default_value_t = 1000)]
    width: i64,

    /// Maximum height in pixels
    #[arg(short = 'y', long, default_value_t = 1000)]
    height: i64,

    /// Maximum number of horizontal or vertical sequences
    #[arg(short = 'm', long, default_value_t = 100)]
    maxseqs: usize,

    /// Which sequences to show from the 1st genome
    #[arg(short = '1', long = "seq1", value_name = "PATTERN")]
    seq1: Vec<String>,

    /// Which sequences to show from the 2nd genome
    #[arg(short = '2', long = "seq2", value_name = "PATTERN")]
    seq2: Vec<String>,

    /// Secondary alignments
    #[arg(long = "alignments", value_name = "FILE")]
    secondary: Option<PathBuf>,

    /// Genome1 sequence order: 0=input order, 1=name order, 2=length order,
    /// 3=alignment order; a `:`-separated second value applies to secondary
    /// alignments
    #[arg(long, default_value = "1", value_name = "N")]
    sort1: String,

    /// Genome2 sequence order (same codes as --sort1)
    #[arg(long, default_value = "1", value_name = "N")]
    sort2: String,

    /// Genome1 sequence orientation: 0=forward orientation, 1=alignment
    /// orientation
    #[arg(long, default_value = "0", value_name = "N")]
    strands1: String,

    /// Genome2 sequence orientation (same codes as --strands1)
    #[arg(long, default_value = "0", value_name = "N")]
    strands2: String,

    /// Maximum unaligned (end,mid) gap in genome1: fraction of aligned length
    #[arg(long, default_value = "1,4", value_name = "FRAC")]
    max_gap1: String,

    /// Maximum unaligned (end,mid) gap in genome2: fraction of aligned length
    #[arg(long, default_value = "1,4", value_name = "FRAC")]
    max_gap2: String,

    /// Pad length when cutting unaligned gaps: fraction of aligned length
    #[arg(long, default_value_t = 0.04, value_name = "FRAC")]
    pad: f64,

    /// Number of pixels between sequences
    #[arg(long, default_value_t = 1, value_name = "INT")]
    border_pixels: i64,

    /// Read genome1 annotations: layer color sequence begin end
    #[arg(short = 'a', long = "annots1", value_name = "FILE")]
    annots1: Vec<PathBuf>,

    /// Read genome2 annotations: layer color sequence begin end
    #[arg(short = 'b', long = "annots2", value_name = "FILE")]
    annots2: Vec<PathBuf>,

    /// Color for forward alignments
    #[arg(short = 'c', long, default_value = "red", value_name = "COLOR")]
    forwardcolor: String,

    /// Color for reverse alignments
    #[arg(short = 'r', long, default_value = "blue", value_name = "COLOR")]
    reversecolor: String,

    /// Color for pixels between sequences
    #[arg(long, default_value = "black", value_name = "COLOR")]
    border_color: String,

    /// Background color
    #[arg(long, default_value = "white", value_name = "COLOR")]
    background_color: String,
}

/// Split `primary:secondary` option text; a single value applies to both.
fn two_values(text: &str) -> (&str, &str) {
    match text.split_once(':') {
        Some((a, b)) => (a, b),
        None => (text, text),
    }
}

fn gap_limits(text: &str) -> Result<(GapLimits, GapLimits)> {
    let (a, b) = two_values(text);
    Ok((
        a.parse().with_context(|| format!("bad gap option {:?}", text))?,
        b.parse().with_context(|| format!("bad gap option {:?}", text))?,
    ))
}

fn plot_options(cli: &Cli) -> Result<PlotOptions> {
    let (sort1, sort_b1) = two_values(&cli.sort1);
    let (sort2, sort_b2) = two_values(&cli.sort2);
    let (strands1, strands_b1) = two_values(&cli.strands1);
    let (strands2, strands_b2) = two_values(&cli.strands2);
    Ok(PlotOptions {
        width: cli.width,
        height: cli.height,
        max_seqs: cli.maxseqs,
        border_pixels: cli.border_pixels,
        pad: cli.pad,
        max_gap1: gap_limits(&cli.max_gap1)?,
        max_gap2: gap_limits(&cli.max_gap2)?,
        ordering: OrderingOptions {
            sort1: (sort1.parse()?, sort_b1.parse()?),
            sort2: (sort2.parse()?, sort_b2.parse()?),
            strands1: (strands1.parse()?, strands_b1.parse()?),
            strands2: (strands2.parse()?, strands_b2.parse()?),
        },
    })
}

fn seq_requests(patterns: &[String]) -> Result<Vec<SeqRequest>> {
    patterns.iter().map(|p| SeqRequest::parse(p)).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose > 0 { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let opts = plot_options(&cli)?;
    let requests1 = seq_requests(&cli.seq1)?;
    let requests2 = seq_requests(&cli.seq2)?;
    let annots1 = annots::read_annot_files(&cli.annots1)?;
    let annots2 = annots::read_annot_files(&cli.annots2)?;
    let palette = render::Palette::new(
        color::parse_color(&cli.forwardcolor)?,
        color::parse_color(&cli.reversecolor)?,
        color::parse_color(&cli.border_color)?,
        color::parse_color(&cli.background_color)?,
    );

    let reader = open_alignment_file(&cli.alignments)
        .with_context(|| format!("can't open {}", cli.alignments.display()))?;
    let groups = read_alignment_groups(reader, &requests1, &requests2)?;
    for (i, group) in groups.into_iter().enumerate() {
        let grid_image = render_group(
            group,
            &opts,
            cli.secondary.as_deref(),
            &annots1,
            &annots2,
        )?;
        log::info!("drawing...");
        let im = render::draw(&grid_image, &palette, cli.border_pixels);
        let file_name = format!("{}{}.png", cli.output, i + 1);
        im.save(&file_name)
            .with_context(|| format!("can't write {}", file_name))?;
        log::info!("wrote {}", file_name);
    }
    Ok(())
}
