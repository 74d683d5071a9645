//! Preparation of static dashboard assets: nightlight radiance cells,
//! distribution statistics, region-clipped road tiles and coordinate
//! precision reduction for GeoJSON and JavaScript data files.

pub mod algo;
pub mod config;
mod error;
pub mod loading;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod prelude;

pub use error::Error;

/// Name reported for road segments whose centroid lies outside every region
pub const UNASSIGNED: &str = "unassigned";

/// Mean length of one degree of latitude, in meters
pub const METERS_PER_DEGREE: f64 = 111_320.0;
