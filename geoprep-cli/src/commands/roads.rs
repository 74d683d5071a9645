use anyhow::{Context, Result};
use geoprep_core::config::PipelineConfig;
use geoprep_core::prelude::{clip_roads, load_regions, load_roads, write_region_tiles};

use crate::args::ClipRoadsArgs;

pub fn run(args: &ClipRoadsArgs, config: &PipelineConfig) -> Result<()> {
    let variable = args
        .variable
        .as_deref()
        .unwrap_or(&config.roads.boundaries_variable);

    let regions = load_regions(&args.boundaries, variable)
        .with_context(|| format!("failed to load boundaries {}", args.boundaries.display()))?;
    let roads = load_roads(&args.roads)
        .with_context(|| format!("failed to load roads {}", args.roads.display()))?;

    let partition = clip_roads(&regions, roads, &config.roads);
    let tiles = write_region_tiles(&partition, &args.out_dir, &config.roads, config.output.pretty)
        .with_context(|| format!("failed to write tiles to {}", args.out_dir.display()))?;

    for tile in &tiles {
        tracing::info!(
            region = %tile.region,
            roads = tile.roads,
            js_bytes = tile.js_bytes,
            "Region tile"
        );
    }
    tracing::info!(
        regions = regions.len(),
        tiles = tiles.len(),
        assigned = partition.assigned(),
        unassigned = partition.unassigned,
        skipped = partition.skipped,
        out_dir = %args.out_dir.display(),
        "Road clipping complete"
    );
    Ok(())
}
