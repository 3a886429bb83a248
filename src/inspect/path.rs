//! Dotted-path resolution over a parsed document.

use serde_json::Value as JsonValue;

use crate::error::CwlError;
use crate::tree::{Document, Record, Value};

/// Resolve a path expression against a document.
///
/// `.` answers the document root without traversal. Otherwise the leading
/// separator is stripped and segments resolve strictly left to right: an
/// integer segment indexes a list, a name segment looks up an identifier
/// basename within an identifier-addressable list or a declared field on a
/// record. The first segment that cannot be resolved fails the whole path
/// with [`CwlError::FieldNotFound`] carrying the full requested path; there
/// is no backtracking.
pub fn resolve<'a>(doc: &'a Document, path: &str) -> Result<Value<'a>, CwlError> {
    if path == "." {
        return Ok(Value::Record(doc.root()));
    }
    let rest = path
        .strip_prefix('.')
        .ok_or_else(|| CwlError::field_not_found(path))?;

    let mut current = Value::Record(doc.root());
    for segment in rest.split('.') {
        current = step(current, segment).ok_or_else(|| CwlError::field_not_found(path))?;
    }
    Ok(current)
}

/// Resolve one segment. `None` is "unresolvable here" regardless of cause;
/// the caller owns the diagnostic.
fn step<'a>(current: Value<'a>, segment: &str) -> Option<Value<'a>> {
    if let Ok(index) = segment.parse::<usize>() {
        return index_into(current, index);
    }

    match current {
        // Identifier-addressable list context: first element whose id
        // basename equals the segment, in list order.
        Value::Records(list) => list.find(segment).map(Value::Record),
        Value::Record(record) => record_field(record, segment),
        // Opaque subtrees stay traversable structurally.
        Value::Json(JsonValue::Object(map)) => map.get(segment).map(Value::Json),
        _ => None,
    }
}

/// An integer segment requires a list on the left.
fn index_into(current: Value<'_>, index: usize) -> Option<Value<'_>> {
    match current {
        Value::Records(list) => list.get(index).map(Value::Record),
        Value::StrList(items) => items.get(index).map(|item| Value::Str(item.as_str())),
        Value::Json(JsonValue::Array(items)) => items.get(index).map(Value::Json),
        _ => None,
    }
}

fn record_field<'a>(record: Record<'a>, name: &str) -> Option<Value<'a>> {
    // A bare base command reads as a one-element argv.
    if let (Record::Tool(tool), "baseCommand") = (record, name) {
        if let Some(command) = &tool.base_command {
            return Some(Value::StrList(command.as_argv()));
        }
    }

    let value = record.field(name)?;

    // First traversal through an inputBinding field fills the default
    // ordering position; later visits see the memoized value.
    if let Value::Record(Record::InputBinding(binding)) = value {
        binding.fill_default_position();
    }

    Some(value)
}
