use anyhow::{Context, Result};
use geoprep_core::config::PipelineConfig;
use geoprep_core::prelude::{build_cell_layer, load_points, write_cell_layer};

use crate::args::PolygonsArgs;

pub fn run(args: &PolygonsArgs, config: &PipelineConfig) -> Result<()> {
    let mut nightlight = config.nightlight.clone();
    if let Some(region) = &args.region {
        nightlight.region.clone_from(region);
    }

    let points = load_points(&args.input)
        .with_context(|| format!("failed to load samples {}", args.input.display()))?;
    let layer = build_cell_layer(&points, &nightlight, args.year)
        .context("failed to build cell layer")?;
    let files = write_cell_layer(&layer, &args.out_dir, &nightlight.region, config.output.pretty)
        .with_context(|| format!("failed to write layer to {}", args.out_dir.display()))?;

    for (class, count) in nightlight.scheme.classes.iter().zip(&layer.counts.counts) {
        tracing::debug!(class = %class.key, count, "Cells per class");
    }
    tracing::info!(
        region = %nightlight.region,
        year = ?layer.year,
        cells = layer.len(),
        background = layer.counts.background,
        invalid = layer.invalid,
        geojson = %files.geojson.display(),
        geojson_bytes = files.geojson_bytes,
        js = %files.js.display(),
        js_bytes = files.js_bytes,
        "Nightlight polygons written"
    );
    Ok(())
}
