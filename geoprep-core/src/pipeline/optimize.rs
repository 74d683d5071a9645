//! Size reduction of published layers: coordinate precision is lowered and
//! JSON is minified

use std::path::Path;

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::Error;
use crate::algo::round_geojson;
use crate::loading::{is_javascript, read_source};
use crate::output::js::rewrite_assignments;

/// File size before and after optimization, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SizeChange {
    pub before: u64,
    pub after: u64,
}

impl SizeChange {
    #[allow(clippy::cast_possible_wrap)]
    pub fn saved(&self) -> i64 {
        self.before as i64 - self.after as i64
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_percent(&self) -> f64 {
        if self.before == 0 {
            0.0
        } else {
            self.saved() as f64 / self.before as f64 * 100.0
        }
    }
}

impl std::ops::Add for SizeChange {
    type Output = SizeChange;

    fn add(self, rhs: SizeChange) -> SizeChange {
        SizeChange {
            before: self.before + rhs.before,
            after: self.after + rhs.after,
        }
    }
}

impl std::iter::Sum for SizeChange {
    fn sum<I: Iterator<Item = SizeChange>>(iter: I) -> Self {
        iter.fold(SizeChange::default(), |acc, change| acc + change)
    }
}

/// Rounds the coordinates of a GeoJSON document and returns it minified
///
/// # Errors
///
/// Returns an error if `src` is not valid JSON.
pub fn optimize_geojson_str(src: &str, digits: u32) -> Result<String, Error> {
    let mut doc: Value = serde_json::from_str(src)?;
    round_geojson(&mut doc, digits);
    Ok(serde_json::to_string(&doc)?)
}

/// Rounds and minifies every JSON declaration of a JavaScript data file.
/// Returns the new source and the number of declarations rewritten.
///
/// # Errors
///
/// Returns an error if a rewritten value cannot be serialized.
pub fn optimize_js_str(src: &str, digits: u32) -> Result<(String, usize), Error> {
    rewrite_assignments(src, false, |_, value| {
        round_geojson(value, digits);
    })
}

/// Optimizes `input` and writes the result to `output`, or back to `input`
/// when `output` is `None`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or the output
/// cannot be written. Nothing is written on error.
pub fn optimize_file(input: &Path, output: Option<&Path>, digits: u32) -> Result<SizeChange, Error> {
    let src = read_source(input)?;
    let before = src.len() as u64;

    let optimized = if is_javascript(input) {
        let (optimized, count) = optimize_js_str(&src, digits)?;
        if count == 0 {
            warn!("{} declares no JSON values, leaving it unchanged", input.display());
        }
        optimized
    } else {
        optimize_geojson_str(&src, digits).map_err(|e| {
            Error::InvalidData(format!("Failed to optimize '{}': {}", input.display(), e))
        })?
    };

    let target = output.unwrap_or(input);
    std::fs::write(target, &optimized)?;
    let change = SizeChange {
        before,
        after: optimized.len() as u64,
    };
    info!(
        "Optimized {}: {} -> {} bytes ({:.1}% smaller)",
        input.display(),
        change.before,
        change.after,
        change.reduction_percent()
    );
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geojson_is_rounded_and_minified() {
        let src = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [43.887187394385, 4.118775587960828]},
      "properties": {"value": 0.3123456}
    }
  ]
}"#;
        let out = optimize_geojson_str(src, 5).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert!(!out.contains('\n'));
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"],
            serde_json::json!([43.88719, 4.11878])
        );
        assert_eq!(value["features"][0]["properties"]["value"], serde_json::json!(0.3123456));
    }

    #[test]
    fn non_coordinate_members_keep_their_text() {
        let src = concat!(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","#,
            r#""properties":{"v":57.002135653908844,"lat":4.11878,"#,
            r#""fclass":"track","Length_m":95,"category":"Rural Light"},"#,
            r#""geometry":null}],"metadata":{"year":2022,"region":"Bakool"}}"#
        );
        assert_eq!(optimize_geojson_str(src, 5).unwrap(), src);
    }

    #[test]
    fn size_change_arithmetic() {
        let total: SizeChange = [
            SizeChange { before: 100, after: 40 },
            SizeChange { before: 100, after: 60 },
        ]
        .into_iter()
        .sum();
        assert_eq!(total, SizeChange { before: 200, after: 100 });
        assert_eq!(total.saved(), 100);
        assert!((total.reduction_percent() - 50.0).abs() < 1e-12);
        assert_eq!(SizeChange::default().reduction_percent(), 0.0);
    }

    #[test]
    fn js_file_is_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.js");
        std::fs::write(
            &path,
            "const adm1Boundaries = {\n  \"type\": \"Point\",\n  \"coordinates\": [45.123456789, 2.1]\n};\n",
        )
        .unwrap();

        let change = optimize_file(&path, None, 5).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let json = content
            .strip_prefix("const adm1Boundaries=")
            .and_then(|rest| rest.strip_suffix(";\n"))
            .unwrap();
        assert!(!json.contains(char::is_whitespace));
        assert_eq!(
            serde_json::from_str::<Value>(json).unwrap(),
            serde_json::json!({"type": "Point", "coordinates": [45.12346, 2.1]})
        );
        assert_eq!(change.after, content.len() as u64);
        assert!(change.after < change.before);
    }

    #[test]
    fn invalid_geojson_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.geojson");
        std::fs::write(&path, "{not json").unwrap();
        assert!(optimize_file(&path, None, 5).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }
}
