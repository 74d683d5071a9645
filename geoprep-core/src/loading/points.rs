use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use super::read_json_document;
use crate::Error;
use crate::model::SamplePoint;

/// Radiance property names tried, in order, on GeoJSON point features
const VALUE_PROPERTIES: [&str; 2] = ["value", "average"];

/// Loads radiance samples from a `{"points": [...]}` document (usually the
/// first declaration of a `.js` data file) or from a GeoJSON point
/// `FeatureCollection`
///
/// # Errors
///
/// Returns an error if the file cannot be read or has neither shape.
pub fn load_points(path: &Path) -> Result<Vec<SamplePoint>, Error> {
    info!("Loading radiance samples from {}", path.display());
    let points = points_from_value(read_json_document(path, None)?)?;
    info!("Loaded {} radiance samples", points.len());
    Ok(points)
}

/// # Errors
///
/// Returns an error if `value` holds neither a `points` array of
/// `{value, lat, lon}` records nor a `features` array.
pub fn points_from_value(mut value: Value) -> Result<Vec<SamplePoint>, Error> {
    if let Some(points) = value.get_mut("points") {
        return Ok(serde_json::from_value(points.take())?);
    }

    let Some(Value::Array(features)) = value.get("features") else {
        return Err(Error::InvalidData(
            "Expected a `points` array or a point FeatureCollection".to_string(),
        ));
    };

    let mut skipped = 0;
    let points: Vec<SamplePoint> = features
        .iter()
        .filter_map(|feature| {
            let point = point_from_feature(feature);
            if point.is_none() {
                skipped += 1;
            }
            point
        })
        .collect();

    if skipped > 0 {
        warn!("{skipped} point features without a usable position or value were skipped");
    }
    Ok(points)
}

fn point_from_feature(feature: &Value) -> Option<SamplePoint> {
    let coords = feature.get("geometry")?.get("coordinates")?;
    let lon = coords.get(0)?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;

    let properties = feature.get("properties")?;
    let value = VALUE_PROPERTIES
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_f64))?;
    if value < 0.0 {
        return None;
    }

    let point = SamplePoint::new(value, lat, lon);
    let year = properties
        .get("year")
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok());
    Some(match year {
        Some(year) => point.with_year(year),
        None => point,
    })
}
