//! Nightlight radiance samples

use geo::Point;
use serde::Deserialize;

/// Single radiance sample (nW/cm²/sr) at a geographic position
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SamplePoint {
    pub value: f64,
    pub lat: f64,
    pub lon: f64,
    /// Acquisition year, when the source records one
    #[serde(default)]
    pub year: Option<i32>,
}

impl SamplePoint {
    pub fn new(value: f64, lat: f64, lon: f64) -> Self {
        Self {
            value,
            lat,
            lon,
            year: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Position as a `geo` point (x = longitude, y = latitude)
    pub fn location(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
            && self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() < 90.0
    }
}
