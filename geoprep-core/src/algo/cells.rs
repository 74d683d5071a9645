//! Square grid cells around sample points

use geo::{LineString, Polygon};

use crate::METERS_PER_DEGREE;

/// Square of `size_m` meters centered on (`lat`, `lon`).
///
/// The ring runs counter-clockwise from the bottom-left corner and is
/// closed. Longitude extent is widened by `1 / cos(lat)`. Returns `None`
/// when the cell cannot be built (non-finite input or a pole).
pub fn square_cell(lat: f64, lon: f64, size_m: f64) -> Option<Polygon<f64>> {
    let lat_offset = size_m / METERS_PER_DEGREE;
    let lon_offset = size_m / (METERS_PER_DEGREE * lat.to_radians().cos());
    if !lat_offset.is_finite() || !lon_offset.is_finite() || !lon.is_finite() {
        return None;
    }

    let (half_lat, half_lon) = (lat_offset / 2.0, lon_offset / 2.0);
    let (west, east) = (lon - half_lon, lon + half_lon);
    let (south, north) = (lat - half_lat, lat + half_lat);

    let ring = LineString::from(vec![
        (west, south),
        (east, south),
        (east, north),
        (west, north),
        (west, south),
    ]);
    Some(Polygon::new(ring, vec![]))
}

/// Cell size label used in layer metadata, e.g. `500m × 500m`
pub fn grid_label(size_m: f64) -> String {
    format!("{size_m}m × {size_m}m")
}
