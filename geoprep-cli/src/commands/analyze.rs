use std::path::Path;

use anyhow::{Context, Result};
use geoprep_core::algo::ClassScheme;
use geoprep_core::config::PipelineConfig;
use geoprep_core::output::{to_json_string, write_json_file};
use geoprep_core::pipeline::{DistributionReport, analyze_points, compare_distributions};
use geoprep_core::prelude::load_points;

use crate::args::AnalyzeArgs;

pub fn run(args: &AnalyzeArgs, config: &PipelineConfig) -> Result<()> {
    let scheme = ClassScheme::contextual();
    let report = analyze_file(&args.input, &scheme)?;

    let document = match &args.compare {
        Some(later) => {
            let after = analyze_file(later, &scheme)?;
            let comparison = compare_distributions(report, after);
            tracing::info!(
                mean_delta = comparison.change.mean.delta,
                mean_percent = ?comparison.change.mean.percent,
                median_delta = comparison.change.median.delta,
                max_delta = comparison.change.max.delta,
                "Distribution change"
            );
            serde_json::to_value(&comparison)?
        }
        None => serde_json::to_value(&report)?,
    };

    match &args.output {
        Some(path) => {
            let bytes = write_json_file(path, &document, config.output.pretty)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes, "Report written");
        }
        None => println!("{}", to_json_string(&document, config.output.pretty)?),
    }
    Ok(())
}

fn analyze_file(path: &Path, scheme: &ClassScheme) -> Result<DistributionReport> {
    let points =
        load_points(path).with_context(|| format!("failed to load samples {}", path.display()))?;
    let report = analyze_points(&points, scheme)
        .with_context(|| format!("failed to analyze {}", path.display()))?;

    let summary = &report.summary;
    tracing::info!(
        input = %path.display(),
        count = summary.count,
        min = summary.min,
        max = summary.max,
        mean = summary.mean,
        median = summary.median,
        std_dev = summary.std_dev,
        "Distribution summary"
    );
    for class in &report.classes {
        tracing::debug!(
            class = %class.key,
            range = %class.range,
            count = class.count,
            percent = class.percent,
            "Class share"
        );
    }
    Ok(report)
}
