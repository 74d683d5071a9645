//! Road network segments

use std::fmt;

use geo::LineString;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Attributes carried from the source road layer into the region tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadAttributes {
    /// Road class code (OSM `fclass`)
    #[serde(default = "default_fclass", deserialize_with = "lenient_string")]
    pub fclass: String,
    /// Segment length in meters, kept exactly as the source layer wrote it
    #[serde(rename = "Length_m", default = "default_length")]
    pub length_m: Value,
    #[serde(
        rename = "Source_Yea",
        default = "default_source_year",
        deserialize_with = "lenient_string"
    )]
    pub source_year: String,
}

impl Default for RoadAttributes {
    fn default() -> Self {
        Self {
            fclass: default_fclass(),
            length_m: default_length(),
            source_year: default_source_year(),
        }
    }
}

impl RoadAttributes {
    /// Field names written into tile metadata
    pub const FIELDS: [&'static str; 3] = ["fclass", "Length_m", "Source_Yea"];

    /// Length in meters, if the source value is a number or numeric string
    pub fn length(&self) -> Option<f64> {
        match &self.length_m {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn default_fclass() -> String {
    "unknown".to_string()
}

fn default_length() -> Value {
    Value::from(0)
}

fn default_source_year() -> String {
    "2023".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
    Null(()),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
        StringOrNumber::Null(()) => String::new(),
    })
}

/// Road polyline with its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Position of the record in the source layer
    pub source_index: usize,
    pub geometry: LineString<f64>,
    pub attributes: RoadAttributes,
}

/// Why a road record was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedGeometry {
    MissingPath,
    EmptyPath,
    SinglePoint,
    InvalidCoordinate,
    NoCentroid,
}

impl fmt::Display for MalformedGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            MalformedGeometry::MissingPath => "no path geometry",
            MalformedGeometry::EmptyPath => "empty coordinate list",
            MalformedGeometry::SinglePoint => "degenerate single-point path",
            MalformedGeometry::InvalidCoordinate => "invalid coordinate",
            MalformedGeometry::NoCentroid => "centroid undefined",
        };
        f.write_str(reason)
    }
}

/// Road layer after parsing: well-formed segments plus the number of
/// records skipped for malformed geometry or unusable attributes
#[derive(Debug, Clone, Default)]
pub struct RoadInput {
    pub segments: Vec<RoadSegment>,
    pub skipped: usize,
}

impl RoadInput {
    pub fn total(&self) -> usize {
        self.segments.len() + self.skipped
    }
}
