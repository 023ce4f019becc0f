//! oxgrid Core Library
//!
//! Alignment parsing, interval arithmetic, axis ordering, pixel layout, and
//! rasterization for Oxford-grid dotplots of pairwise genomic alignments.

pub mod annot;
pub mod cover;
pub mod ingest;
pub mod io;
pub mod layout;
pub mod pipeline;
pub mod raster;
pub mod select;
pub mod sort;
pub mod types;

// Re-export commonly used types and functions
pub use annot::{Annot, AnnotBox};
pub use ingest::{read_alignment_groups, GroupInput};
pub use pipeline::{render_group, GridImage, PlotError, PlotOptions};
pub use raster::HitGrid;
pub use select::SeqRequest;
pub use sort::{OrderingOptions, SortMode, StrandMode};
pub use types::{Alignment, Block, Bp, SeqRange};

/// Version information for the oxgrid core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
