use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{Coord, LineString};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::{is_javascript, read_json_document};
use crate::Error;
use crate::model::{MalformedGeometry, RoadAttributes, RoadInput, RoadSegment};

/// ESRI JSON feature set (`features[].geometry.paths`,
/// `features[].attributes`). GeoJSON line collections are read through the
/// same shape, with `properties` standing in for `attributes`.
#[derive(Debug, Deserialize)]
struct FeatureSet {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default, alias = "properties")]
    attributes: Option<Value>,
}

impl RawFeature {
    /// Attributes of the record; a missing or `null` object gives the
    /// defaults
    fn attributes(&mut self) -> Result<RoadAttributes, serde_json::Error> {
        match self.attributes.take() {
            None | Some(Value::Null) => Ok(RoadAttributes::default()),
            Some(value) => serde_json::from_value(value),
        }
    }
}

/// Loads the road layer from an ESRI JSON / GeoJSON file, or from the
/// first declaration of a `.js` data file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a feature set.
/// Individual records with malformed geometry are skipped and counted.
pub fn load_roads(path: &Path) -> Result<RoadInput, Error> {
    info!("Loading road segments from {}", path.display());
    let set: FeatureSet = if is_javascript(path) {
        serde_json::from_value(read_json_document(path, None)?)?
    } else {
        let file = File::open(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", path.display(), e),
            ))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            Error::InvalidData(format!("Failed to parse '{}': {}", path.display(), e))
        })?
    };
    Ok(segments_from_features(set.features))
}

/// # Errors
///
/// Returns an error if `value` has no `features` array.
pub fn roads_from_value(value: Value) -> Result<RoadInput, Error> {
    let set: FeatureSet = serde_json::from_value(value)?;
    Ok(segments_from_features(set.features))
}

fn segments_from_features(features: Vec<RawFeature>) -> RoadInput {
    let mut input = RoadInput::default();

    for (idx, mut feature) in features.into_iter().enumerate() {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(MalformedGeometry::MissingPath)
            .and_then(polyline_from_geometry);
        let geometry = match geometry {
            Ok(geometry) => geometry,
            Err(reason) => {
                debug!("Skipping road {}: {reason}", idx + 1);
                input.skipped += 1;
                continue;
            }
        };

        match feature.attributes() {
            Ok(attributes) => input.segments.push(RoadSegment {
                source_index: idx,
                geometry,
                attributes,
            }),
            Err(e) => {
                warn!("Skipping road {}: unusable attributes ({e})", idx + 1);
                input.skipped += 1;
            }
        }
    }

    info!("Loaded {} road segments", input.segments.len());
    if input.skipped > 0 {
        warn!(
            "{} road records skipped for malformed geometry or attributes",
            input.skipped
        );
    }
    input
}

/// Polyline of a road geometry: the first ESRI path, a GeoJSON
/// `LineString`, or the first part of a GeoJSON `MultiLineString`
///
/// # Errors
///
/// Returns the reason the geometry cannot be used as a segment.
pub fn polyline_from_geometry(geometry: &Value) -> Result<LineString<f64>, MalformedGeometry> {
    let path = if let Some(paths) = geometry.get("paths") {
        paths.get(0)
    } else {
        let coords = geometry.get("coordinates");
        match geometry.get("type").and_then(Value::as_str) {
            Some("MultiLineString") => coords.and_then(|c| c.get(0)),
            _ => coords,
        }
    };

    let points = path
        .ok_or(MalformedGeometry::MissingPath)?
        .as_array()
        .ok_or(MalformedGeometry::InvalidCoordinate)?;

    match points.len() {
        0 => return Err(MalformedGeometry::EmptyPath),
        1 => return Err(MalformedGeometry::SinglePoint),
        _ => {}
    }

    points
        .iter()
        .map(|point| {
            let x = point.get(0).and_then(Value::as_f64);
            let y = point.get(1).and_then(Value::as_f64);
            match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
                _ => Err(MalformedGeometry::InvalidCoordinate),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_first_esri_path_and_attributes() {
        let geometry = json!({"paths": [[[45.0, 2.0], [45.1, 2.1]], [[0.0, 0.0], [1.0, 1.0]]]});
        let line = polyline_from_geometry(&geometry).unwrap();
        assert_eq!(line.0, vec![Coord { x: 45.0, y: 2.0 }, Coord { x: 45.1, y: 2.1 }]);
    }

    #[test]
    fn reads_geojson_lines() {
        let line = json!({"type": "LineString", "coordinates": [[1, 2], [3, 4]]});
        assert_eq!(polyline_from_geometry(&line).unwrap().0.len(), 2);
        let multi = json!({"type": "MultiLineString", "coordinates": [[[1, 2], [3, 4], [5, 6]]]});
        assert_eq!(polyline_from_geometry(&multi).unwrap().0.len(), 3);
    }

    #[test]
    fn classifies_malformed_geometry() {
        let cases = [
            (json!({}), MalformedGeometry::MissingPath),
            (json!({"paths": []}), MalformedGeometry::MissingPath),
            (json!({"paths": [[]]}), MalformedGeometry::EmptyPath),
            (json!({"paths": [[[1.0, 2.0]]]}), MalformedGeometry::SinglePoint),
            (json!({"paths": [[[1.0, 2.0], [1.0]]]}), MalformedGeometry::InvalidCoordinate),
            (json!({"paths": [[[1.0, 2.0], ["a", 2.0]]]}), MalformedGeometry::InvalidCoordinate),
            (json!({"paths": "none"}), MalformedGeometry::MissingPath),
        ];
        for (geometry, expected) in cases {
            assert_eq!(polyline_from_geometry(&geometry), Err(expected), "{geometry}");
        }
    }

    #[test]
    fn malformed_records_are_counted_not_fatal() {
        let value = json!({
            "features": [
                {"geometry": {"paths": [[[45.0, 2.0], [45.1, 2.1]]]},
                 "attributes": {"fclass": "primary", "Length_m": 120.5, "Source_Yea": "2022"}},
                {"geometry": null, "attributes": {"fclass": "track"}},
                {"geometry": {"paths": [[[45.0, 2.0]]]}, "attributes": {}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[1, 1], [2, 2]]},
                 "properties": {"fclass": "residential"}}
            ]
        });
        let input = roads_from_value(value).unwrap();
        assert_eq!(input.segments.len(), 2);
        assert_eq!(input.skipped, 2);
        assert_eq!(input.total(), 4);
        assert_eq!(input.segments[0].attributes.fclass, "primary");
        assert_eq!(input.segments[1].source_index, 3);
        assert_eq!(input.segments[1].attributes.fclass, "residential");
        assert_eq!(input.segments[1].attributes.source_year, "2023");
    }

    #[test]
    fn unusable_attributes_skip_only_that_record() {
        let value = json!({
            "features": [
                {"geometry": {"paths": [[[45.0, 2.0], [45.1, 2.1]]]},
                 "attributes": {"fclass": "track", "Length_m": "n/a"}},
                {"geometry": {"paths": [[[45.0, 2.0], [45.1, 2.1]]]},
                 "attributes": {"fclass": ["primary"], "Length_m": 10}},
                {"geometry": {"paths": [[[45.0, 2.0], [45.1, 2.1]]]},
                 "attributes": {"fclass": "path", "Length_m": 95}},
                {"geometry": {"paths": [[[45.0, 2.0], [45.1, 2.1]]]}, "attributes": null}
            ]
        });
        let input = roads_from_value(value).unwrap();
        assert_eq!(input.segments.len(), 3);
        assert_eq!(input.skipped, 1);
        assert_eq!(input.segments[0].attributes.length_m, json!("n/a"));
        assert_eq!(input.segments[1].source_index, 2);
        assert_eq!(input.segments[1].attributes.length_m, json!(95));
        assert_eq!(input.segments[2].attributes, RoadAttributes::default());
    }

    #[test]
    fn missing_feature_array_is_fatal() {
        assert!(roads_from_value(json!({"type": "FeatureCollection"})).is_err());
    }
}
