//! Radiance classification schemes

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One radiance class, covering `[min, next class min)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightClass {
    /// Inclusive lower bound (nW/cm²/sr)
    pub min: f64,
    /// Machine-readable key used in layer metadata
    pub key: String,
    pub category: String,
    pub label: String,
    /// Fill color as a CSS hex string
    pub color: String,
}

impl LightClass {
    pub fn new(min: f64, key: &str, category: &str, label: &str, color: &str) -> Self {
        Self {
            min,
            key: key.to_string(),
            category: category.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

/// Ordered classes; values below the first lower bound are background and
/// get no class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScheme {
    pub classes: Vec<LightClass>,
}

impl Default for ClassScheme {
    fn default() -> Self {
        Self::rural_polygons()
    }
}

impl ClassScheme {
    /// Four classes tuned for a sparsely lit rural region, background below
    /// 0.25
    pub fn rural_polygons() -> Self {
        Self {
            classes: vec![
                LightClass::new(0.25, "low_rural", "Low Rural Light", "Low Rural", "#5b21b6"),
                LightClass::new(0.35, "rural", "Rural Light", "Rural", "#a855f7"),
                LightClass::new(
                    0.50,
                    "small_town",
                    "Bright Rural / Small Town",
                    "Small Town",
                    "#fbbf24",
                ),
                LightClass::new(0.70, "urban", "Urban Center", "Urban", "#fde047"),
            ],
        }
    }

    /// Six-bin contextual classification starting at zero
    pub fn contextual() -> Self {
        Self {
            classes: vec![
                LightClass::new(
                    0.000,
                    "very_low",
                    "Very Low (Background)",
                    "Background/minimal light",
                    "#1e1b4b",
                ),
                LightClass::new(
                    0.260,
                    "low_rural",
                    "Low Rural",
                    "Very sparse rural settlements",
                    "#5b21b6",
                ),
                LightClass::new(0.285, "rural", "Rural", "Typical rural areas", "#8b5cf6"),
                LightClass::new(
                    0.310,
                    "moderate_rural",
                    "Moderate Rural",
                    "More developed rural areas",
                    "#a855f7",
                ),
                LightClass::new(
                    0.350,
                    "bright_rural",
                    "Bright Rural",
                    "Rural centers/small settlements",
                    "#fbbf24",
                ),
                LightClass::new(
                    0.500,
                    "settlement_urban",
                    "Settlement/Urban",
                    "Small towns/settlements",
                    "#fde047",
                ),
            ],
        }
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidScheme` if the scheme has no classes, a
    /// non-finite bound, bounds that do not strictly increase, or a
    /// repeated key.
    pub fn validate(&self) -> Result<(), Error> {
        if self.classes.is_empty() {
            return Err(Error::InvalidScheme("no classes defined".to_string()));
        }
        if let Some(class) = self.classes.iter().find(|c| !c.min.is_finite()) {
            return Err(Error::InvalidScheme(format!(
                "class `{}` has non-finite lower bound",
                class.key
            )));
        }
        if let Some((a, b)) = self
            .classes
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.min >= b.min)
        {
            return Err(Error::InvalidScheme(format!(
                "lower bound of `{}` ({}) must be below `{}` ({})",
                a.key, a.min, b.key, b.min
            )));
        }
        if let Some(key) = self.classes.iter().map(|c| &c.key).duplicates().next() {
            return Err(Error::InvalidScheme(format!("duplicate class key `{key}`")));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Lowest classified value; anything below is background
    pub fn floor(&self) -> Option<f64> {
        self.classes.first().map(|c| c.min)
    }

    /// Exclusive upper bound of class `idx`, `None` for the last class
    pub fn upper_bound(&self, idx: usize) -> Option<f64> {
        self.classes.get(idx + 1).map(|c| c.min)
    }

    /// Class index for `value`, `None` for background or NaN
    pub fn class_index(&self, value: f64) -> Option<usize> {
        self.classes
            .partition_point(|c| c.min <= value)
            .checked_sub(1)
    }

    pub fn classify(&self, value: f64) -> Option<&LightClass> {
        self.class_index(value).map(|idx| &self.classes[idx])
    }

    /// Human-readable range of class `idx`, e.g. `0.25-0.35` or `>0.70`
    pub fn range_label(&self, idx: usize) -> String {
        let min = format_bound(self.classes[idx].min);
        match self.upper_bound(idx) {
            Some(max) => format!("{min}-{}", format_bound(max)),
            None => format!(">{min}"),
        }
    }

    pub fn count<I>(&self, values: I) -> ClassCounts
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0; self.classes.len()];
        let mut background = 0;
        for value in values {
            match self.class_index(value) {
                Some(idx) => counts[idx] += 1,
                None => background += 1,
            }
        }
        ClassCounts { counts, background }
    }
}

/// At least two decimals, more when the bound needs them
fn format_bound(value: f64) -> String {
    let shortest = value.to_string();
    let decimals = shortest.split_once('.').map_or(0, |(_, frac)| frac.len());
    format!("{value:.prec$}", prec = decimals.max(2))
}

/// Per-class tallies, index-aligned with `ClassScheme::classes`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassCounts {
    pub counts: Vec<usize>,
    pub background: usize,
}

impl ClassCounts {
    pub fn classified(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn total(&self) -> usize {
        self.classified() + self.background
    }
}
