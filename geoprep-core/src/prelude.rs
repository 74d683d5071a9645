pub use crate::UNASSIGNED;

// Re-export key components
pub use crate::algo::{ClassScheme, RegionIndex, RoadPartition, assign_region};
pub use crate::config::{NightlightConfig, OptimizeConfig, PipelineConfig, RoadsConfig};
pub use crate::loading::{load_points, load_regions, load_roads};
pub use crate::model::{Region, RegionSet, RoadInput, RoadSegment, SamplePoint};
pub use crate::pipeline::{
    analyze_points, build_cell_layer, clip_roads, compare_distributions, optimize_file,
    write_cell_layer, write_region_tiles,
};

pub use crate::Error;
