//! Projection of inspection results onto plain JSON values.
//!
//! This is the serialization boundary of the node model: the document's
//! class discriminator is emitted as the `class` key here and nowhere
//! else, and only fields present in the document (or filled by
//! normalization, like a binding's default position) appear in the
//! output.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::inspect::{Inspection, Location};
use crate::tree::{Record, Value};

/// Project a dispatched query result.
pub fn save(result: &Inspection) -> JsonValue {
    match result {
        Inspection::Value(value) => save_value(*value),
        Inspection::Keys(names) => names.iter().map(|name| name.as_str()).collect(),
        Inspection::Location(location) => save_location(location),
    }
}

/// Project a traversal value.
pub fn save_value(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Str(text) => text.into(),
        Value::Int(number) => number.into(),
        Value::Bool(flag) => flag.into(),
        Value::StrList(items) => items.iter().map(|item| item.as_str()).collect(),
        Value::Json(json) => json.clone(),
        Value::Record(record) => save_record(record),
        Value::Records(list) => list.iter().map(save_record).collect(),
    }
}

/// Project a record as an object of its present fields, in field-table
/// order.
pub fn save_record(record: Record) -> JsonValue {
    let mut fields = JsonMap::new();
    for name in record.field_names() {
        match record.field(name) {
            None | Some(Value::Null) => {}
            Some(value) => {
                fields.insert((*name).to_string(), save_value(value));
            }
        }
    }
    JsonValue::Object(fields)
}

fn save_location(location: &Location) -> JsonValue {
    match location {
        Location::File(path) => path.as_str().into(),
        Location::Files(paths) => paths.iter().map(|path| path.as_str()).collect(),
    }
}
