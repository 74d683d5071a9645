//! Serialization of prepared layers to GeoJSON and JavaScript data files

pub mod js;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde::Serialize;
use serde_json::Value;

use crate::Error;
use crate::loading::js::DeclKeyword;

/// Serializes `value` either indented by two spaces or minified
pub fn to_json_string<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, Error> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, Error> {
    let file = File::create(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to create '{}': {}", path.display(), e),
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Writes `value` as a JSON file and returns the number of bytes written
pub fn write_json_file<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<u64, Error> {
    let mut writer = create(path)?;
    write_json(&mut writer, value, pretty)?;
    writer.flush()?;
    Ok(std::fs::metadata(path)?.len())
}

/// Writes `keyword name = <json>;` and returns the number of bytes written
pub fn write_js_file<T: Serialize + ?Sized>(
    path: &Path,
    keyword: DeclKeyword,
    name: &str,
    value: &T,
    pretty: bool,
) -> Result<u64, Error> {
    let mut writer = create(path)?;
    let separator = if pretty { " = " } else { "=" };
    write!(writer, "{keyword} {name}{separator}")?;
    write_json(&mut writer, value, pretty)?;
    writer.write_all(b";")?;
    writer.flush()?;
    Ok(std::fs::metadata(path)?.len())
}

/// `FeatureCollection` carrying a top-level `metadata` member
pub fn feature_collection(features: Vec<Feature>, metadata: Value) -> FeatureCollection {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("metadata".to_string(), metadata);
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: Some(foreign_members),
    }
}

/// File-name-safe form of a region name (spaces and slashes become `_`)
pub fn file_stem(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// JavaScript identifier built from `name` (lower-cased) and `suffix`,
/// e.g. `("Lower Juba", "Roads")` gives `lower_jubaRoads`
pub fn js_variable(name: &str, suffix: &str) -> String {
    let mut ident: String = file_stem(name)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident.push_str(suffix);
    ident
}

/// Decimal count with `,` thousands separators, e.g. `99,875`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_are_made_safe() {
        assert_eq!(file_stem("Lower Juba"), "Lower_Juba");
        assert_eq!(file_stem("Banadir/Mogadishu"), "Banadir_Mogadishu");
        assert_eq!(js_variable("Lower Juba", "Roads"), "lower_jubaRoads");
        assert_eq!(js_variable("Galgaduud-North", "Roads"), "galgaduud_northRoads");
        assert_eq!(js_variable("2nd Zone", "Roads"), "_2nd_zoneRoads");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(99_875), "99,875");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn js_file_wraps_minified_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.js");
        let bytes = write_js_file(&path, DeclKeyword::Var, "bayRoads", &json!({"a": [1, 2]}), false)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"var bayRoads={"a":[1,2]};"#);
        assert_eq!(bytes, content.len() as u64);
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let text = to_json_string(&json!({"a": 1}), true).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn metadata_is_a_foreign_member() {
        let collection = feature_collection(vec![], json!({"region": "Bay"}));
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["metadata"]["region"], "Bay");
        assert_eq!(value["features"], json!([]));
    }
}
