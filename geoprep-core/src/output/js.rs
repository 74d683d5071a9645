//! Rewriting of JSON declarations inside JavaScript data files

use serde::Serialize;
use serde_json::Value;

use super::to_json_string;
use crate::Error;
use crate::loading::js::{DeclKeyword, parse_assignments};

/// `keyword name = <json>;`, minified as `keyword name=<json>;`
pub fn declaration<T: Serialize + ?Sized>(
    keyword: DeclKeyword,
    name: &str,
    value: &T,
    pretty: bool,
) -> Result<String, Error> {
    let json = to_json_string(value, pretty)?;
    Ok(if pretty {
        format!("{keyword} {name} = {json};")
    } else {
        format!("{keyword} {name}={json};")
    })
}

/// Re-serializes every JSON declaration of `src` after passing its value
/// through `edit`. Text outside the declarations is kept byte for byte.
/// Returns the new source and the number of declarations rewritten.
pub fn rewrite_assignments<F>(src: &str, pretty: bool, mut edit: F) -> Result<(String, usize), Error>
where
    F: FnMut(&str, &mut Value),
{
    let assignments = parse_assignments(src);
    let count = assignments.len();
    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;

    for mut assignment in assignments {
        out.push_str(&src[cursor..assignment.span.start]);
        edit(&assignment.name, &mut assignment.value);
        out.push_str(&declaration(
            assignment.keyword,
            &assignment.name,
            &assignment.value,
            pretty,
        )?);
        cursor = assignment.span.end;
    }
    out.push_str(&src[cursor..]);

    Ok((out, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declaration_formats() {
        let value = json!({"k": [1]});
        assert_eq!(
            declaration(DeclKeyword::Const, "x", &value, false).unwrap(),
            r#"const x={"k":[1]};"#
        );
        assert_eq!(
            declaration(DeclKeyword::Var, "x", &value, true).unwrap(),
            "var x = {\n  \"k\": [\n    1\n  ]\n};"
        );
    }

    #[test]
    fn rewrite_keeps_surrounding_code() {
        let src = "// data\nconst a = {\n  \"n\": 1.23456\n};\nfunction f() { return a; }\nvar b = [ 2 ];\n";
        let (out, count) = rewrite_assignments(src, false, |name, value| {
            if name == "a" {
                value["n"] = json!(1.2);
            }
        })
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            out,
            "// data\nconst a={\"n\":1.2};\nfunction f() { return a; }\nvar b=[2];\n"
        );
    }
}
