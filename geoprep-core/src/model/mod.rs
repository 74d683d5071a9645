//! Data model for dashboard asset preparation
//!
//! Contains nightlight sample points, administrative regions and
//! attributed road segments.

pub mod nightlight;
pub mod region;
pub mod road;

pub use nightlight::SamplePoint;
pub use region::{Region, RegionSet};
pub use road::{MalformedGeometry, RoadAttributes, RoadInput, RoadSegment};
