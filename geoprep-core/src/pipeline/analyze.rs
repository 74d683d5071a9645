//! Radiance distribution analysis used to choose classification breaks

use log::warn;
use serde::Serialize;

use crate::Error;
use crate::algo::stats::{Comparison, Percentile, REPORT_PERCENTILES, Sample, Summary, compare};
use crate::algo::ClassScheme;
use crate::model::SamplePoint;

/// Number of bins for equal-width and equal-frequency binnings
pub const DISTRIBUTION_BINS: usize = 6;

/// Interior breaks of the data-driven binning; the outer edges are the
/// sample minimum and maximum
pub const DATA_DRIVEN_BREAKS: [f64; 5] = [0.270, 0.290, 0.310, 0.350, 0.450];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binning {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Binning {
    fn new(sample: &Sample, edges: Vec<f64>) -> Result<Self, Error> {
        let counts = sample.histogram(&edges)?;
        Ok(Self { edges, counts })
    }
}

/// Count of one class of a scheme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTally {
    pub key: String,
    pub category: String,
    pub range: String,
    pub color: String,
    pub count: usize,
    /// Share of the whole sample, in percent
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub summary: Summary,
    pub percentiles: Vec<Percentile>,
    pub equal_width: Binning,
    pub equal_frequency: Binning,
    /// `None` when the sample range does not enclose the fixed breaks
    pub data_driven: Option<Binning>,
    pub classes: Vec<ClassTally>,
    /// Values below the first class of the scheme
    pub unclassified: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionComparison {
    pub before: DistributionReport,
    pub after: DistributionReport,
    pub change: Comparison,
}

/// # Errors
///
/// Returns an error for an empty sample or one with non-finite values, or
/// when `scheme` is invalid.
#[allow(clippy::cast_precision_loss)]
pub fn analyze_distribution(
    values: Vec<f64>,
    scheme: &ClassScheme,
) -> Result<DistributionReport, Error> {
    scheme.validate()?;
    let sample = Sample::new(values)?;

    let equal_width = Binning::new(&sample, sample.equal_width_edges(DISTRIBUTION_BINS))?;
    let equal_frequency = Binning::new(&sample, sample.equal_frequency_edges(DISTRIBUTION_BINS))?;

    let mut breaks = Vec::with_capacity(DATA_DRIVEN_BREAKS.len() + 2);
    breaks.push(sample.min());
    breaks.extend(DATA_DRIVEN_BREAKS);
    breaks.push(sample.max());
    let data_driven = match Binning::new(&sample, breaks) {
        Ok(binning) => Some(binning),
        Err(e) => {
            warn!("Data-driven binning not applicable to this sample: {e}");
            None
        }
    };

    let counts = scheme.count(sample.values().iter().copied());
    let total = sample.len() as f64;
    let classes = scheme
        .classes
        .iter()
        .zip(&counts.counts)
        .enumerate()
        .map(|(idx, (class, &count))| ClassTally {
            key: class.key.clone(),
            category: class.category.clone(),
            range: scheme.range_label(idx),
            color: class.color.clone(),
            count,
            percent: count as f64 / total * 100.0,
        })
        .collect();

    Ok(DistributionReport {
        summary: sample.summary(),
        percentiles: sample.percentiles(&REPORT_PERCENTILES),
        equal_width,
        equal_frequency,
        data_driven,
        classes,
        unclassified: counts.background,
    })
}

/// # Errors
///
/// See [`analyze_distribution`].
pub fn analyze_points(
    points: &[SamplePoint],
    scheme: &ClassScheme,
) -> Result<DistributionReport, Error> {
    analyze_distribution(points.iter().map(|p| p.value).collect(), scheme)
}

pub fn compare_distributions(
    before: DistributionReport,
    after: DistributionReport,
) -> DistributionComparison {
    let change = compare(&before.summary, &after.summary);
    DistributionComparison {
        before,
        after,
        change,
    }
}
