//! Coordinate precision reduction for GeoJSON documents held as JSON values

use serde_json::{Number, Value};

/// Rounds half away from zero at `digits` decimal places
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    if !factor.is_finite() {
        return value;
    }
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Rounds every floating-point number in a (nested) coordinate array.
/// Integers and non-numeric members are left as they are.
pub fn round_coordinates(coords: &mut Value, digits: u32) {
    match coords {
        Value::Array(items) => {
            for item in items {
                round_coordinates(item, digits);
            }
        }
        Value::Number(n) if n.is_f64() => {
            if let Some(rounded) = n.as_f64().and_then(|v| Number::from_f64(round_to(v, digits))) {
                *n = rounded;
            }
        }
        _ => {}
    }
}

/// Rounds the coordinates of every feature geometry of a FeatureCollection,
/// or of a bare geometry. Returns the number of geometries touched.
pub fn round_geojson(doc: &mut Value, digits: u32) -> usize {
    let Value::Object(map) = doc else {
        return 0;
    };

    if let Some(Value::Array(features)) = map.get_mut("features") {
        return features
            .iter_mut()
            .filter_map(|feature| feature.get_mut("geometry"))
            .filter_map(|geometry| geometry.get_mut("coordinates"))
            .map(|coords| round_coordinates(coords, digits))
            .count();
    }

    match map.get_mut("coordinates") {
        Some(coords) => {
            round_coordinates(coords, digits);
            1
        }
        None => 0,
    }
}
