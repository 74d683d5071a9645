//! Pipeline configuration.
//!
//! Every field has a default, so an empty document (or no document at all)
//! yields the standard dashboard settings.

use serde::Deserialize;

use crate::Error;
use crate::algo::ClassScheme;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub nightlight: NightlightConfig,
    pub roads: RoadsConfig,
    pub optimize: OptimizeConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// # Errors
    ///
    /// Returns an error if any section holds values the pipelines cannot
    /// work with.
    pub fn validate(&self) -> Result<(), Error> {
        self.nightlight.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NightlightConfig {
    /// Edge length of generated cells in meters
    pub cell_size_m: f64,
    /// Region name recorded in layer metadata and used for variable names
    pub region: String,
    /// Decimal digits kept for the radiance value property
    pub value_digits: u32,
    pub scheme: ClassScheme,
}

impl Default for NightlightConfig {
    fn default() -> Self {
        Self {
            cell_size_m: 500.0,
            region: "Bakool".to_string(),
            value_digits: 3,
            scheme: ClassScheme::rural_polygons(),
        }
    }
}

impl NightlightConfig {
    fn validate(&self) -> Result<(), Error> {
        if !(self.cell_size_m.is_finite() && self.cell_size_m > 0.0) {
            return Err(Error::InvalidData(format!(
                "cell_size_m must be a positive number, got {}",
                self.cell_size_m
            )));
        }
        self.scheme.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadsConfig {
    /// Source label recorded in every region tile
    pub data_source: String,
    /// JavaScript variable holding region boundaries in a `.js` data file
    pub boundaries_variable: String,
    pub use_spatial_index: bool,
}

impl Default for RoadsConfig {
    fn default() -> Self {
        Self {
            data_source: "OpenStreetMap Somalia Roads 2023".to_string(),
            boundaries_variable: "adm1Boundaries".to_string(),
            use_spatial_index: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Decimal digits kept for nightlight and boundary layers
    pub points_precision: u32,
    /// Decimal digits kept for road tiles
    pub roads_precision: u32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            points_precision: 5,
            roads_precision: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Indent written JSON with two spaces instead of minifying it
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}
