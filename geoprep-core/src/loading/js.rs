//! Extraction of JSON literals assigned to variables in JavaScript data
//! files (`const name = {...};`).
//!
//! Only declarations whose right-hand side is a JSON object or array are
//! recognised; anything else in the file is ignored.

use std::fmt;
use std::ops::Range;

use serde_json::Value;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Const,
    Let,
    Var,
}

impl DeclKeyword {
    const ALL: [DeclKeyword; 3] = [DeclKeyword::Const, DeclKeyword::Let, DeclKeyword::Var];

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKeyword::Const => "const",
            DeclKeyword::Let => "let",
            DeclKeyword::Var => "var",
        }
    }
}

impl fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `keyword name = <json>;` statement
#[derive(Debug, Clone, PartialEq)]
pub struct JsAssignment {
    pub keyword: DeclKeyword,
    pub name: String,
    pub value: Value,
    /// Byte range of the whole statement, trailing `;` included
    pub span: Range<usize>,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Matches `keyword name =` at `pos`, returning the keyword, the name and
/// the offset of the first byte of the value
fn declaration_at(src: &str, pos: usize) -> Option<(DeclKeyword, &str, usize)> {
    let bytes = src.as_bytes();
    if pos > 0 && is_ident_byte(bytes[pos - 1]) {
        return None;
    }
    let keyword = DeclKeyword::ALL
        .into_iter()
        .find(|kw| bytes[pos..].starts_with(kw.as_str().as_bytes()))?;

    let after_keyword = pos + keyword.as_str().len();
    let name_start = skip_whitespace(bytes, after_keyword);
    if name_start == after_keyword {
        return None;
    }
    let mut name_end = name_start;
    while name_end < bytes.len() && is_ident_byte(bytes[name_end]) {
        name_end += 1;
    }
    if name_end == name_start || bytes[name_start].is_ascii_digit() {
        return None;
    }

    let eq = skip_whitespace(bytes, name_end);
    if bytes.get(eq) != Some(&b'=') || bytes.get(eq + 1) == Some(&b'=') {
        return None;
    }
    let value_start = skip_whitespace(bytes, eq + 1);
    match bytes.get(value_start) {
        Some(b'{' | b'[') => Some((keyword, &src[name_start..name_end], value_start)),
        _ => None,
    }
}

fn json_value_at(src: &str, start: usize) -> Option<(Value, usize)> {
    let mut stream = serde_json::Deserializer::from_str(&src[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Some((value, start + stream.byte_offset())),
        _ => None,
    }
}

/// All JSON-valued declarations in source order
pub fn parse_assignments(src: &str) -> Vec<JsAssignment> {
    let bytes = src.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some((keyword, name, value_start)) = declaration_at(src, pos) else {
            pos += 1;
            continue;
        };
        let Some((value, value_end)) = json_value_at(src, value_start) else {
            log::debug!("Declaration `{name}` is not a JSON literal, leaving it untouched");
            pos = value_start;
            continue;
        };

        let mut end = skip_whitespace(bytes, value_end);
        if bytes.get(end) == Some(&b';') {
            end += 1;
        } else {
            end = value_end;
        }

        found.push(JsAssignment {
            keyword,
            name: name.to_string(),
            value,
            span: pos..end,
        });
        pos = end;
    }

    found
}

/// Value assigned to `name`
///
/// # Errors
///
/// Returns `Error::MissingAssignment` if no JSON declaration of `name`
/// exists.
pub fn find_assignment(src: &str, name: &str) -> Result<Value, Error> {
    parse_assignments(src)
        .into_iter()
        .find(|a| a.name == name)
        .map(|a| a.value)
        .ok_or_else(|| Error::MissingAssignment(name.to_string()))
}

/// First JSON declaration of the file
///
/// # Errors
///
/// Returns `Error::MissingAssignment` if the file declares no JSON value.
pub fn first_assignment(src: &str) -> Result<JsAssignment, Error> {
    parse_assignments(src)
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingAssignment("<any>".to_string()))
}
