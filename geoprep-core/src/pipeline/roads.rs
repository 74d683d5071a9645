//! Clipping of the road layer into per-region tiles

use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use log::info;
use serde_json::json;

use crate::Error;
use crate::algo::{RegionIndex, RegionRoads, RoadPartition, partition_roads};
use crate::config::RoadsConfig;
use crate::loading::js::DeclKeyword;
use crate::model::{RegionSet, RoadAttributes, RoadInput, RoadSegment};
use crate::output::{feature_collection, file_stem, js_variable, write_js_file, write_json_file};

/// Assigns every road segment to the first region containing its centroid
pub fn clip_roads(regions: &RegionSet, input: RoadInput, config: &RoadsConfig) -> RoadPartition {
    let index = RegionIndex::new(regions, config.use_spatial_index);
    let partition = partition_roads(&index, input);
    info!(
        "Road processing complete: {} assigned, {} unassigned, {} skipped",
        partition.assigned(),
        partition.unassigned,
        partition.skipped
    );
    partition
}

/// GeoJSON tile of one region's roads with a `metadata` member
///
/// # Errors
///
/// Returns an error if a feature cannot be built.
pub fn region_tile(roads: &RegionRoads, data_source: &str) -> Result<FeatureCollection, Error> {
    let features = roads
        .roads
        .iter()
        .map(road_feature)
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = json!({
        "region": roads.name,
        "total_roads": roads.roads.len(),
        "data_source": data_source,
        "fields": RoadAttributes::FIELDS,
    });
    Ok(feature_collection(features, metadata))
}

fn road_feature(segment: &RoadSegment) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&segment.geometry));
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": segment.attributes,
    });
    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

/// Written tile of one region
#[derive(Debug, Clone)]
pub struct TileSummary {
    pub region: String,
    pub roads: usize,
    pub geojson: PathBuf,
    pub js: PathBuf,
    pub geojson_bytes: u64,
    pub js_bytes: u64,
}

/// Writes `<Region_Name>_roads.geojson` and `<Region_Name>_roads.js` for
/// every region with at least one road. Summaries are ordered by road
/// count, largest first, ties in region order.
///
/// # Errors
///
/// Returns an error if the output directory or a file cannot be written.
pub fn write_region_tiles(
    partition: &RoadPartition,
    out_dir: &Path,
    config: &RoadsConfig,
    pretty: bool,
) -> Result<Vec<TileSummary>, Error> {
    std::fs::create_dir_all(out_dir)?;

    let mut summaries = Vec::new();
    for roads in partition.populated() {
        let tile = region_tile(roads, &config.data_source)?;
        let stem = file_stem(&roads.name);
        let geojson = out_dir.join(format!("{stem}_roads.geojson"));
        let js = out_dir.join(format!("{stem}_roads.js"));

        let geojson_bytes = write_json_file(&geojson, &tile, pretty)?;
        let js_bytes = write_js_file(
            &js,
            DeclKeyword::Var,
            &js_variable(&roads.name, "Roads"),
            &tile,
            pretty,
        )?;
        info!("{}: {} roads ({} bytes)", roads.name, roads.roads.len(), js_bytes);

        summaries.push(TileSummary {
            region: roads.name.clone(),
            roads: roads.roads.len(),
            geojson,
            js,
            geojson_bytes,
            js_bytes,
        });
    }

    summaries.sort_by(|a, b| b.roads.cmp(&a.roads));
    Ok(summaries)
}
