mod analyze;
mod optimize;
mod polygons;
mod roads;

use anyhow::Result;
use geoprep_core::config::PipelineConfig;

use crate::args::Command;

pub fn run(command: Command, config: &PipelineConfig) -> Result<()> {
    match command {
        Command::Analyze(args) => analyze::run(&args, config),
        Command::Polygons(args) => polygons::run(&args, config),
        Command::ClipRoads(args) => roads::run(&args, config),
        Command::Optimize(args) => optimize::run(&args, config),
    }
}
