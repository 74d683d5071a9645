use std::path::Path;

use anyhow::{Context, Result};
use geoprep_core::config::PipelineConfig;

/// Reads and validates the pipeline configuration, falling back to the
/// defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    Ok(config)
}

fn parse(text: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
