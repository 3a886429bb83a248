//! Field and identifier enumeration (`keys(...)`).

use serde_json::Value as JsonValue;

use crate::error::CwlError;
use crate::inspect::path;
use crate::tree::{Document, Value};

/// List what is addressable at `path`, sorted lexicographically.
///
/// An identifier-addressable list answers the full id of every element
/// that declares one; a record answers its declared field names; an opaque
/// JSON object answers its keys. The sort makes the listing deterministic
/// regardless of declaration order, which keeps snapshot-style diffs
/// stable.
pub fn keys(doc: &Document, path: &str) -> Result<Vec<String>, CwlError> {
    let mut names: Vec<String> = match path::resolve(doc, path)? {
        Value::Records(list) => list.ids().into_iter().map(str::to_string).collect(),
        Value::Record(record) => record
            .field_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
        Value::Json(JsonValue::Object(map)) => map.keys().cloned().collect(),
        _ => return Err(CwlError::field_not_found(path)),
    };
    names.sort();
    names.dedup();
    Ok(names)
}
