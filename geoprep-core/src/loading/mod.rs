//! This module is responsible for reading source layers (GeoJSON, ESRI JSON
//! and JavaScript data files) into the data model.

pub mod js;
mod points;
mod regions;
mod roads;

use std::path::Path;

pub use points::{load_points, points_from_value};
pub use regions::{load_regions, regions_from_value};
pub use roads::{load_roads, polyline_from_geometry, roads_from_value};

use crate::Error;

/// Whether `path` names a JavaScript data file rather than plain JSON
pub fn is_javascript(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
}

pub(crate) fn read_source(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to read '{}': {}", path.display(), e),
        ))
    })
}

/// Reads a JSON document, or the JSON value assigned to `variable` (or the
/// first declaration when `variable` is `None`) in a `.js` file
pub(crate) fn read_json_document(
    path: &Path,
    variable: Option<&str>,
) -> Result<serde_json::Value, Error> {
    let content = read_source(path)?;
    if is_javascript(path) {
        match variable {
            Some(name) => js::find_assignment(&content, name),
            None => js::first_assignment(&content).map(|a| a.value),
        }
    } else {
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidData(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}
