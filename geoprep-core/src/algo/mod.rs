//! Pure transformations: region assignment, statistics, classification,
//! cell synthesis and precision reduction

pub mod assign;
pub mod cells;
pub mod classify;
pub mod precision;
pub mod stats;

pub use assign::{
    RegionIndex, RegionRoads, RoadPartition, assign_region, partition_roads, segment_centroid,
};
pub use cells::{grid_label, square_cell};
pub use classify::{ClassCounts, ClassScheme, LightClass};
pub use precision::{round_coordinates, round_geojson, round_to};
pub use stats::{Comparison, Sample, Summary, compare, histogram};
