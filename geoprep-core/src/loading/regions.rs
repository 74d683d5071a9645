use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson};
use log::{debug, info, warn};
use serde_json::Value;

use super::read_json_document;
use crate::Error;
use crate::model::{Region, RegionSet};

/// Properties tried, in order, for a region's display name
const NAME_PROPERTIES: [&str; 2] = ["name", "ADM1_EN"];

/// Loads region boundaries from a GeoJSON file, or from the `variable`
/// declaration of a `.js` data file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds no named
/// polygon.
pub fn load_regions(path: &Path, variable: &str) -> Result<RegionSet, Error> {
    info!("Loading region boundaries from {}", path.display());
    let value = read_json_document(path, Some(variable))?;
    regions_from_value(value)
}

/// Builds a region set from a GeoJSON `FeatureCollection` value
///
/// # Errors
///
/// Returns an error if `value` is not a feature collection or holds no
/// named polygon.
pub fn regions_from_value(value: Value) -> Result<RegionSet, Error> {
    let GeoJson::FeatureCollection(collection) = serde_json::from_value::<GeoJson>(value).map_err(geojson::Error::from)? else {
        return Err(Error::InvalidData(
            "Region boundaries must be a FeatureCollection".to_string(),
        ));
    };

    let mut regions = RegionSet::new();
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = region_name(&feature) else {
            debug!("Boundary feature {idx} has no name, skipping");
            continue;
        };
        let Some(geometry) = region_geometry(feature)? else {
            warn!("Region {name} has no polygon geometry, skipping");
            continue;
        };
        debug!("Loaded region {name}");
        if regions.insert(Region::new(name.clone(), geometry)).is_some() {
            warn!("Region {name} is defined more than once; keeping the last geometry");
        }
    }

    if regions.is_empty() {
        return Err(Error::InvalidData(
            "No named region polygons found".to_string(),
        ));
    }
    info!("Loaded {} regions", regions.len());

    for (a, b) in regions.overlapping_pairs() {
        if let (Some(a), Some(b)) = (regions.get(a), regions.get(b)) {
            warn!(
                "Regions {} and {} overlap; roads in the overlap go to {}",
                a.name, b.name, a.name
            );
        }
    }

    Ok(regions)
}

fn region_name(feature: &Feature) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    NAME_PROPERTIES
        .iter()
        .filter_map(|key| properties.get(*key))
        .filter_map(Value::as_str)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn region_geometry(feature: Feature) -> Result<Option<MultiPolygon<f64>>, Error> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };
    let geometry: Geometry<f64> = geometry.try_into()?;
    Ok(match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Some(multi),
        _ => None,
    })
}
