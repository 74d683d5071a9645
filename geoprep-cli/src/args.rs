use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// `geoprep` - prepares nightlight and road layers for the regional
/// dashboard.
///
/// Every subcommand reads plain files and writes GeoJSON plus a matching
/// JavaScript data file that the dashboard loads with a `<script>` tag.
#[derive(Parser, Debug)]
#[command(name = "geoprep", version, about, long_about = None)]
pub struct Cli {
    /// TOML pipeline configuration. Built-in defaults apply when omitted.
    #[arg(long, global = true, env = "GEOPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log per-record detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe the radiance distribution of a sample file as JSON
    Analyze(AnalyzeArgs),
    /// Turn radiance samples into classified square cells
    Polygons(PolygonsArgs),
    /// Split a road layer into one tile per region
    ClipRoads(ClipRoadsArgs),
    /// Lower coordinate precision and minify layers
    Optimize(OptimizeArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Radiance samples (`.js` points file or GeoJSON)
    pub input: PathBuf,

    /// Second sample file, reported as the later year
    #[arg(long)]
    pub compare: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PolygonsArgs {
    /// Radiance samples (`.js` points file or GeoJSON)
    pub input: PathBuf,

    /// Year recorded on the layer and every cell, replacing the sample
    /// years
    #[arg(long)]
    pub year: Option<i32>,

    /// Region name, overriding `nightlight.region`
    #[arg(long)]
    pub region: Option<String>,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ClipRoadsArgs {
    /// Region boundaries: GeoJSON, or a `.js` data file
    pub boundaries: PathBuf,

    /// Road layer: ESRI JSON, GeoJSON or a `.js` data file
    pub roads: PathBuf,

    /// Variable holding the boundaries in a `.js` file, overriding
    /// `roads.boundaries_variable`
    #[arg(long)]
    pub variable: Option<String>,

    #[arg(long, default_value = "roads_by_region")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// GeoJSON or `.js` files, rewritten in place unless `--output` is given
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Decimal digits kept in coordinates
    #[arg(long)]
    pub precision: Option<u32>,

    /// Use the road tile precision instead of the point layer one
    #[arg(long)]
    pub roads: bool,

    /// Output file; only valid with a single input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OptimizeArgs {
    pub fn digits(&self, points_precision: u32, roads_precision: u32) -> u32 {
        match (self.precision, self.roads) {
            (Some(digits), _) => digits,
            (None, true) => roads_precision,
            (None, false) => points_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "geoprep",
            "clip-roads",
            "data.js",
            "roads.json",
            "--verbose",
            "--config",
            "geoprep.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("geoprep.toml")));
        let Command::ClipRoads(args) = cli.command else {
            panic!("expected clip-roads");
        };
        assert_eq!(args.out_dir, PathBuf::from("roads_by_region"));
        assert_eq!(args.variable, None);
    }

    #[test]
    fn optimize_precision_selection() {
        let parse = |argv: &[&str]| match Cli::try_parse_from(argv).unwrap().command {
            Command::Optimize(args) => args,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(parse(&["geoprep", "optimize", "a.js"]).digits(5, 6), 5);
        assert_eq!(parse(&["geoprep", "optimize", "--roads", "a.js"]).digits(5, 6), 6);
        assert_eq!(
            parse(&["geoprep", "optimize", "--roads", "--precision", "3", "a.js"]).digits(5, 6),
            3
        );
        assert!(Cli::try_parse_from(["geoprep", "optimize"]).is_err());
    }
}
