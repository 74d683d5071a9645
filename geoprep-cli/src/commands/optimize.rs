use anyhow::{Context, Result, bail};
use geoprep_core::config::PipelineConfig;
use geoprep_core::pipeline::{SizeChange, optimize_file};

use crate::args::OptimizeArgs;

pub fn run(args: &OptimizeArgs, config: &PipelineConfig) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output can only be used with a single input file");
    }
    let digits = args.digits(
        config.optimize.points_precision,
        config.optimize.roads_precision,
    );

    let mut total = SizeChange::default();
    for input in &args.inputs {
        let change = optimize_file(input, args.output.as_deref(), digits)
            .with_context(|| format!("failed to optimize {}", input.display()))?;
        total = total + change;
    }

    tracing::info!(
        files = args.inputs.len(),
        digits,
        before = total.before,
        after = total.after,
        saved = total.saved(),
        reduction_percent = total.reduction_percent(),
        "Optimization complete"
    );
    Ok(())
}
