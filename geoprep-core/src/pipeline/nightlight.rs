//! Conversion of radiance samples into classified square cells

use std::path::{Path, PathBuf};

use geo::Polygon;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use itertools::Itertools;
use log::{info, warn};
use serde_json::{Map, Value, json};

use crate::Error;
use crate::algo::{ClassCounts, grid_label, round_to, square_cell};
use crate::config::NightlightConfig;
use crate::loading::js::DeclKeyword;
use crate::model::SamplePoint;
use crate::output::{
    feature_collection, file_stem, group_thousands, js_variable, write_js_file, write_json_file,
};

/// Classified cell layer ready to be written
#[derive(Debug, Clone)]
pub struct CellLayer {
    pub collection: FeatureCollection,
    pub counts: ClassCounts,
    /// Samples dropped for non-finite values or unusable positions
    pub invalid: usize,
    pub year: Option<i32>,
}

impl CellLayer {
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

/// Year shared by all samples, if they record one and agree on it
pub fn common_year(points: &[SamplePoint]) -> Option<i32> {
    points.iter().map(|p| p.year).all_equal_value().ok().flatten()
}

/// Builds one cell polygon per sample whose value falls in a class of the
/// configured scheme. Samples below the scheme floor are counted as
/// background and dropped.
///
/// An explicit `year` is recorded on the layer and on every cell,
/// replacing the sample years. Otherwise cells keep their sample year and
/// the layer gets the year shared by all samples, if any.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build_cell_layer(
    points: &[SamplePoint],
    config: &NightlightConfig,
    year: Option<i32>,
) -> Result<CellLayer, Error> {
    config.scheme.validate()?;
    let layer_year = year.or_else(|| common_year(points));
    let scheme = &config.scheme;
    let grid_size = grid_label(config.cell_size_m);

    let mut counts = ClassCounts {
        counts: vec![0; scheme.len()],
        background: 0,
    };
    let mut invalid = 0;
    let mut features = Vec::new();

    for point in points {
        if !point.is_valid() {
            invalid += 1;
            continue;
        }
        let Some(class_idx) = scheme.class_index(point.value) else {
            counts.background += 1;
            continue;
        };
        let Some(cell) = square_cell(point.lat, point.lon, config.cell_size_m) else {
            invalid += 1;
            continue;
        };

        counts.counts[class_idx] += 1;
        let class = &scheme.classes[class_idx];
        features.push(cell_feature(
            &cell,
            json!({
                "value": round_to(point.value, config.value_digits),
                "category": class.category,
                "color": class.color,
                "label": class.label,
                "lat": point.lat,
                "lon": point.lon,
                "year": year.or(point.year),
                "region": config.region,
                "grid_size": grid_size,
            }),
        )?);
    }

    if invalid > 0 {
        warn!("{invalid} samples with unusable values or positions were dropped");
    }
    info!(
        "Built {} cells, removed {} background samples below {}",
        features.len(),
        counts.background,
        scheme.floor().unwrap_or_default()
    );

    let classification: Map<String, Value> = scheme
        .classes
        .iter()
        .enumerate()
        .map(|(idx, class)| {
            (
                class.key.clone(),
                Value::String(format!(
                    "{} nW/cm²/sr ({} cells)",
                    scheme.range_label(idx),
                    group_thousands(counts.counts[idx])
                )),
            )
        })
        .collect();

    let metadata = json!({
        "year": layer_year,
        "region": config.region,
        "grid_size": grid_size,
        "classification": classification,
        "total_polygons": features.len(),
        "removed_background": counts.background,
    });

    Ok(CellLayer {
        collection: feature_collection(features, metadata),
        counts,
        invalid,
        year: layer_year,
    })
}

fn cell_feature(cell: &Polygon<f64>, properties: Value) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(cell));
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });
    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

/// Paths and sizes of a written layer
#[derive(Debug, Clone)]
pub struct LayerFiles {
    pub geojson: PathBuf,
    pub js: PathBuf,
    pub geojson_bytes: u64,
    pub js_bytes: u64,
}

/// Writes `<region>_nightlight_polygons[_<year>].geojson` and the matching
/// `.js` file declaring `<region>NightlightPolygons[<year>]`
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn write_cell_layer(
    layer: &CellLayer,
    out_dir: &Path,
    region: &str,
    pretty: bool,
) -> Result<LayerFiles, Error> {
    std::fs::create_dir_all(out_dir)?;
    let year_suffix = layer.year.map(|y| y.to_string()).unwrap_or_default();
    let stem = match layer.year {
        Some(year) => format!("{}_nightlight_polygons_{year}", file_stem(region).to_lowercase()),
        None => format!("{}_nightlight_polygons", file_stem(region).to_lowercase()),
    };

    let geojson = out_dir.join(format!("{stem}.geojson"));
    let js = out_dir.join(format!("{stem}.js"));
    let variable = js_variable(region, &format!("NightlightPolygons{year_suffix}"));

    let geojson_bytes = write_json_file(&geojson, &layer.collection, pretty)?;
    let js_bytes = write_js_file(&js, DeclKeyword::Const, &variable, &layer.collection, pretty)?;
    info!("Wrote {} and {}", geojson.display(), js.display());

    Ok(LayerFiles {
        geojson,
        js,
        geojson_bytes,
        js_bytes,
    })
}
