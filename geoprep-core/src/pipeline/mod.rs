//! End-to-end jobs, one per prepared asset type

pub mod analyze;
pub mod nightlight;
pub mod optimize;
pub mod roads;

pub use analyze::{
    DistributionComparison, DistributionReport, analyze_distribution, analyze_points,
    compare_distributions,
};
pub use nightlight::{CellLayer, LayerFiles, build_cell_layer, write_cell_layer};
pub use optimize::{SizeChange, optimize_file};
pub use roads::{TileSummary, clip_roads, region_tile, write_region_tiles};
