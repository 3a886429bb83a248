//! Document loading: the JSON form of a CWL description into the tree.
//!
//! The serde model does the heavy lifting (`class`-tagged dispatch,
//! camelCase wire names); the helpers here cover the spots where CWL's
//! wire format is looser than the tree: identifier-addressable lists may
//! be written as arrays or as maps keyed by id, a map entry may be a bare
//! type string, and a declared binding position lands in its memoization
//! cell. YAML input is out of scope; the accepted input is the canonical
//! JSON form (e.g. `cwltool --pack` output).

use once_cell::sync::OnceCell;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

use crate::error::CwlError;
use crate::tree::{Document, Parameter, WorkflowStep};

/// Parse a document from its JSON source text.
pub fn parse(source: &str) -> Result<Document, CwlError> {
    serde_json::from_str(source).map_err(|err| CwlError::parse(err.to_string()))
}

/// Read and parse a document file.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document, CwlError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .map_err(|err| CwlError::load(path.display().to_string(), err.to_string()))?;
    serde_json::from_str(&source)
        .map_err(|err| CwlError::load(path.display().to_string(), err.to_string()))
}

/// Accessor pair the list helpers need to derive ids from map keys.
pub(crate) trait Identified {
    fn id(&self) -> Option<&str>;
    fn assign_id(&mut self, id: String);
}

impl Identified for Parameter {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl Identified for WorkflowStep {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Deserialize an `inputs`/`outputs` list from either wire form.
pub(crate) fn parameter_list<'de, D>(deserializer: D) -> Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    identified_entries(raw, "parameter", Parameter::of_type).map_err(de::Error::custom)
}

/// Deserialize a `steps` list from either wire form.
pub(crate) fn step_list<'de, D>(deserializer: D) -> Result<Vec<WorkflowStep>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    identified_entries(raw, "step", |_| None).map_err(de::Error::custom)
}

/// Deserialize a declared `position` into its memoization cell.
pub(crate) fn position_cell<'de, D>(deserializer: D) -> Result<OnceCell<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let declared = Option::<i64>::deserialize(deserializer)?;
    let cell = OnceCell::new();
    if let Some(position) = declared {
        let _ = cell.set(position);
    }
    Ok(cell)
}

/// An identifier-addressable list in either wire form: an array of
/// records, or a map whose keys become the element ids. Map entries keep
/// their declaration order (`serde_json` is built with `preserve_order`).
fn identified_entries<T>(
    raw: JsonValue,
    kind: &str,
    shorthand: fn(String) -> Option<T>,
) -> Result<Vec<T>, String>
where
    T: DeserializeOwned + Identified,
{
    match raw {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| identified_entry(None, item, kind, shorthand))
            .collect(),
        JsonValue::Object(map) => map
            .into_iter()
            .map(|(key, item)| identified_entry(Some(key), item, kind, shorthand))
            .collect(),
        _ => Err(format!("{kind} section must be a list or a map")),
    }
}

fn identified_entry<T>(
    key: Option<String>,
    raw: JsonValue,
    kind: &str,
    shorthand: fn(String) -> Option<T>,
) -> Result<T, String>
where
    T: DeserializeOwned + Identified,
{
    if let JsonValue::String(text) = raw {
        // Map-form shorthand, e.g. `inputs: {name: string}`.
        let Some(key) = key else {
            return Err(format!("bare string is not a valid {kind} entry"));
        };
        let Some(mut entry) = shorthand(text) else {
            return Err(format!("{kind} entry for '{key}' must be a record"));
        };
        entry.assign_id(key);
        return Ok(entry);
    }

    if !raw.is_object() {
        return Err(format!("malformed {kind} entry"));
    }
    let mut entry: T =
        serde_json::from_value(raw).map_err(|err| format!("malformed {kind} entry: {err}"))?;
    if entry.id().is_none() {
        if let Some(key) = key {
            entry.assign_id(key);
        }
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Record;
    use serde_json::json;

    #[test]
    fn test_parse_dispatches_on_class() {
        let tool = parse(r#"{"class": "CommandLineTool", "cwlVersion": "v1.0"}"#).unwrap();
        assert_eq!(tool.class(), "CommandLineTool");

        let workflow = parse(r#"{"class": "Workflow", "cwlVersion": "v1.0"}"#).unwrap();
        assert_eq!(workflow.class(), "Workflow");
    }

    #[test]
    fn test_unknown_class_is_a_parse_error() {
        let err = parse(r#"{"class": "ExpressionTool"}"#).unwrap_err();
        assert!(matches!(err, CwlError::Parse { .. }));
    }

    #[test]
    fn test_map_and_list_inputs_parse_alike() {
        let list_form = parse(
            &json!({
                "class": "CommandLineTool",
                "inputs": [{"id": "name", "type": "string"}],
                "outputs": []
            })
            .to_string(),
        )
        .unwrap();
        let map_form = parse(
            &json!({
                "class": "CommandLineTool",
                "inputs": {"name": {"type": "string"}},
                "outputs": []
            })
            .to_string(),
        )
        .unwrap();

        for doc in [&list_form, &map_form] {
            let Document::CommandLineTool(tool) = doc else {
                panic!("expected a tool");
            };
            assert_eq!(tool.inputs.len(), 1);
            assert_eq!(tool.inputs[0].id.as_deref(), Some("name"));
            assert_eq!(tool.inputs[0].r#type, Some(json!("string")));
        }
    }

    #[test]
    fn test_map_shorthand_string_is_the_type() {
        let doc = parse(
            &json!({
                "class": "Workflow",
                "inputs": {"threads": "int", "reads": "File"},
                "outputs": {},
                "steps": {}
            })
            .to_string(),
        )
        .unwrap();
        let Document::Workflow(workflow) = doc else {
            panic!("expected a workflow");
        };
        // Declaration order survives the map form.
        assert_eq!(workflow.inputs[0].id.as_deref(), Some("threads"));
        assert_eq!(workflow.inputs[0].r#type, Some(json!("int")));
        assert_eq!(workflow.inputs[1].id.as_deref(), Some("reads"));
    }

    #[test]
    fn test_step_shorthand_is_rejected() {
        let err = parse(
            &json!({
                "class": "Workflow",
                "inputs": {},
                "outputs": {},
                "steps": {"one": "echo.cwl"}
            })
            .to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, CwlError::Parse { .. }));
    }

    #[test]
    fn test_declared_position_lands_in_the_cell() {
        let doc = parse(
            &json!({
                "class": "CommandLineTool",
                "inputs": {"name": {"type": "string", "inputBinding": {"position": 3}}},
                "outputs": []
            })
            .to_string(),
        )
        .unwrap();
        let Document::CommandLineTool(tool) = &doc else {
            panic!("expected a tool");
        };
        let binding = tool.inputs[0].input_binding.as_ref().unwrap();
        assert_eq!(binding.position(), Some(3));
        // An explicit position is never overwritten by the default fill.
        assert_eq!(binding.fill_default_position(), 3);
    }

    #[test]
    fn test_extra_document_fields_are_tolerated() {
        let doc = parse(
            &json!({
                "class": "CommandLineTool",
                "cwlVersion": "v1.0",
                "$namespaces": {"edam": "http://edamontology.org/"}
            })
            .to_string(),
        )
        .unwrap();
        let Document::CommandLineTool(tool) = &doc else {
            panic!("expected a tool");
        };
        assert!(Record::Tool(tool).field("$namespaces").is_none());
    }

    #[test]
    fn test_load_document_missing_file() {
        let err = load_document("/nonexistent/echo.cwl").unwrap_err();
        assert!(matches!(err, CwlError::Load { .. }));
    }
}
