//! Descriptive statistics over radiance samples.
//!
//! Percentiles and quantiles interpolate linearly between the closest
//! ranks; histograms count `[e_i, e_{i+1})` with the last bin closed on the
//! right, and ignore values outside the outer edges.

use itertools::Itertools;
use serde::Serialize;

use crate::Error;

/// Percentile ranks reported in distribution summaries
pub const REPORT_PERCENTILES: [u8; 7] = [10, 25, 50, 75, 90, 95, 99];

/// Sorted, finite, non-empty sample
#[derive(Debug, Clone)]
pub struct Sample {
    sorted: Vec<f64>,
}

impl Sample {
    /// # Errors
    ///
    /// Returns `Error::InvalidData` for an empty sample or one containing
    /// non-finite values.
    pub fn new(mut values: Vec<f64>) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::InvalidData("Empty sample".to_string()));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidData(format!(
                "Sample contains non-finite value {bad}"
            )));
        }
        values.sort_by(f64::total_cmp);
        Ok(Self { sorted: values })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.sorted
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        self.sorted.iter().sum::<f64>() / self.sorted.len() as f64
    }

    /// Population standard deviation
    #[allow(clippy::cast_precision_loss)]
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .sorted
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.sorted.len() as f64;
        variance.sqrt()
    }

    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Percentile for `p` in `0..=100`
    pub fn percentile(&self, p: f64) -> f64 {
        self.quantile(p / 100.0)
    }

    /// Quantile for `q` in `0..=1`, clamped
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn quantile(&self, q: f64) -> f64 {
        let rank = q.clamp(0.0, 1.0) * (self.sorted.len() - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let (a, b) = (self.sorted[lo], self.sorted[hi]);
        a + (b - a) * (rank - lo as f64)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            count: self.len(),
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
            median: self.median(),
            std_dev: self.std_dev(),
        }
    }

    pub fn percentiles(&self, ranks: &[u8]) -> Vec<Percentile> {
        ranks
            .iter()
            .map(|&rank| Percentile {
                rank,
                value: self.percentile(f64::from(rank)),
            })
            .collect()
    }

    /// `bins + 1` evenly spaced edges from min to max
    pub fn equal_width_edges(&self, bins: usize) -> Vec<f64> {
        linspace(self.min(), self.max(), bins + 1)
    }

    /// `bins + 1` edges at quantiles `k / bins`
    #[allow(clippy::cast_precision_loss)]
    pub fn equal_frequency_edges(&self, bins: usize) -> Vec<f64> {
        (0..=bins)
            .map(|k| self.quantile(k as f64 / bins as f64))
            .collect()
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidEdges` if `edges` is shorter than two or not
    /// non-decreasing.
    pub fn histogram(&self, edges: &[f64]) -> Result<Vec<usize>, Error> {
        histogram(&self.sorted, edges)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    pub rank: u8,
    pub value: f64,
}

/// Absolute and relative change of one statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Change {
    pub before: f64,
    pub after: f64,
    pub delta: f64,
    /// Percent change relative to `before`; `None` when `before` is zero
    pub percent: Option<f64>,
}

impl Change {
    pub fn new(before: f64, after: f64) -> Self {
        let delta = after - before;
        Self {
            before,
            after,
            delta,
            percent: (before != 0.0).then(|| delta / before * 100.0),
        }
    }
}

/// Comparison of two summaries, e.g. consecutive years
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub mean: Change,
    pub median: Change,
    pub max: Change,
}

pub fn compare(before: &Summary, after: &Summary) -> Comparison {
    Comparison {
        mean: Change::new(before.mean, after.mean),
        median: Change::new(before.median, after.median),
        max: Change::new(before.max, after.max),
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Counts of `values` per bin.
///
/// # Errors
///
/// Returns `Error::InvalidEdges` if `edges` is shorter than two, contains
/// non-finite values, or decreases anywhere.
pub fn histogram(values: &[f64], edges: &[f64]) -> Result<Vec<usize>, Error> {
    let valid = edges.len() >= 2
        && edges.iter().all(|e| e.is_finite())
        && edges.iter().tuple_windows().all(|(a, b)| a <= b);
    if !valid {
        return Err(Error::InvalidEdges(edges.to_vec()));
    }

    let bins = edges.len() - 1;
    let (first, last) = (edges[0], edges[bins]);
    let mut counts = vec![0; bins];
    for &v in values {
        if v < first || v > last || v.is_nan() {
            continue;
        }
        let bin = if v == last {
            bins - 1
        } else {
            edges.partition_point(|&e| e <= v) - 1
        };
        counts[bin] += 1;
    }
    Ok(counts)
}
