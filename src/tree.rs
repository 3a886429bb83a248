//! CWL document tree: typed record nodes and their traversal views.
//!
//! A parsed document is a closed set of record structs, one per CWL node
//! kind. Traversal (path resolution, key enumeration, serialization) goes
//! through the borrowed [`Value`]/[`Record`]/[`RecordList`] views: every
//! record kind declares a fixed field table and answers field lookups from
//! its typed fields, so there is no runtime reflection anywhere.
//!
//! Fields the query engine never interprets (requirements, hints,
//! defaults, complex type forms, step wiring) are carried as opaque
//! `serde_json::Value` subtrees; they stay traversable structurally but
//! are never inspected semantically.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::parser;

/// Root of a parsed tool or workflow description.
///
/// The `class` discriminator selects the variant at the parse boundary and
/// gates which query forms are legal. Within the tree it is answered as an
/// ordinary `class` field; no storage alias ever leaks out of the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "class")]
pub enum Document {
    CommandLineTool(CommandLineTool),
    Workflow(Workflow),
}

impl Document {
    /// The document's class name, as written in the `class` field.
    pub fn class(&self) -> &'static str {
        match self {
            Document::CommandLineTool(_) => "CommandLineTool",
            Document::Workflow(_) => "Workflow",
        }
    }

    /// The root record, the starting point of every traversal.
    pub fn root(&self) -> Record<'_> {
        match self {
            Document::CommandLineTool(tool) => Record::Tool(tool),
            Document::Workflow(workflow) => Record::Workflow(workflow),
        }
    }
}

/// A command-line tool description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandLineTool {
    pub cwl_version: Option<String>,
    pub id: Option<String>,
    pub label: Option<String>,
    pub doc: Option<String>,
    pub base_command: Option<BaseCommand>,
    pub arguments: Option<JsonValue>,
    #[serde(deserialize_with = "parser::parameter_list")]
    pub inputs: Vec<Parameter>,
    #[serde(deserialize_with = "parser::parameter_list")]
    pub outputs: Vec<Parameter>,
    pub requirements: Option<JsonValue>,
    pub hints: Option<JsonValue>,
    pub stdin: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub success_codes: Option<JsonValue>,
    pub temporary_fail_codes: Option<JsonValue>,
    pub permanent_fail_codes: Option<JsonValue>,
}

impl CommandLineTool {
    pub const FIELDS: &'static [&'static str] = &[
        "arguments",
        "baseCommand",
        "class",
        "cwlVersion",
        "doc",
        "hints",
        "id",
        "inputs",
        "label",
        "outputs",
        "permanentFailCodes",
        "requirements",
        "stderr",
        "stdin",
        "stdout",
        "successCodes",
        "temporaryFailCodes",
    ];

    fn field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "arguments" => json_field(&self.arguments),
            "baseCommand" => match &self.base_command {
                Some(BaseCommand::Line(line)) => Value::Str(line),
                Some(BaseCommand::Argv(argv)) => Value::StrList(argv),
                None => Value::Null,
            },
            "class" => Value::Str("CommandLineTool"),
            "cwlVersion" => str_field(&self.cwl_version),
            "doc" => str_field(&self.doc),
            "hints" => json_field(&self.hints),
            "id" => str_field(&self.id),
            "inputs" => Value::Records(RecordList::Inputs(&self.inputs)),
            "label" => str_field(&self.label),
            "outputs" => Value::Records(RecordList::Outputs(&self.outputs)),
            "permanentFailCodes" => json_field(&self.permanent_fail_codes),
            "requirements" => json_field(&self.requirements),
            "stderr" => str_field(&self.stderr),
            "stdin" => str_field(&self.stdin),
            "stdout" => str_field(&self.stdout),
            "successCodes" => json_field(&self.success_codes),
            "temporaryFailCodes" => json_field(&self.temporary_fail_codes),
            _ => return None,
        };
        Some(value)
    }
}

/// A workflow description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Workflow {
    pub cwl_version: Option<String>,
    pub id: Option<String>,
    pub label: Option<String>,
    pub doc: Option<String>,
    #[serde(deserialize_with = "parser::parameter_list")]
    pub inputs: Vec<Parameter>,
    #[serde(deserialize_with = "parser::parameter_list")]
    pub outputs: Vec<Parameter>,
    #[serde(deserialize_with = "parser::step_list")]
    pub steps: Vec<WorkflowStep>,
    pub requirements: Option<JsonValue>,
    pub hints: Option<JsonValue>,
}

impl Workflow {
    pub const FIELDS: &'static [&'static str] = &[
        "class",
        "cwlVersion",
        "doc",
        "hints",
        "id",
        "inputs",
        "label",
        "outputs",
        "requirements",
        "steps",
    ];

    fn field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "class" => Value::Str("Workflow"),
            "cwlVersion" => str_field(&self.cwl_version),
            "doc" => str_field(&self.doc),
            "hints" => json_field(&self.hints),
            "id" => str_field(&self.id),
            "inputs" => Value::Records(RecordList::Inputs(&self.inputs)),
            "label" => str_field(&self.label),
            "outputs" => Value::Records(RecordList::Outputs(&self.outputs)),
            "requirements" => json_field(&self.requirements),
            "steps" => Value::Records(RecordList::Steps(&self.steps)),
            _ => return None,
        };
        Some(value)
    }
}

/// The tool's base command: a bare program name or a full argv prefix.
///
/// Kept exactly as declared; the resolver widens the bare form to a
/// one-element argv during traversal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BaseCommand {
    Line(String),
    Argv(Vec<String>),
}

impl BaseCommand {
    pub fn as_argv(&self) -> &[String] {
        match self {
            BaseCommand::Line(line) => std::slice::from_ref(line),
            BaseCommand::Argv(argv) => argv,
        }
    }
}

/// An input or output parameter of a tool, or of a workflow.
///
/// Inputs and outputs share one schema; only one of `input_binding` /
/// `output_binding` is ever populated, and [`Record::Input`] vs.
/// [`Record::Output`] keeps the two field tables apart during traversal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub id: Option<String>,
    pub label: Option<String>,
    pub doc: Option<String>,
    pub r#type: Option<JsonValue>,
    pub default: Option<JsonValue>,
    pub format: Option<JsonValue>,
    pub streamable: Option<bool>,
    pub secondary_files: Option<JsonValue>,
    pub output_source: Option<JsonValue>,
    pub input_binding: Option<CommandLineBinding>,
    pub output_binding: Option<CommandOutputBinding>,
}

impl Parameter {
    pub const INPUT_FIELDS: &'static [&'static str] = &[
        "default",
        "doc",
        "format",
        "id",
        "inputBinding",
        "label",
        "secondaryFiles",
        "streamable",
        "type",
    ];

    pub const OUTPUT_FIELDS: &'static [&'static str] = &[
        "doc",
        "format",
        "id",
        "label",
        "outputBinding",
        "outputSource",
        "secondaryFiles",
        "streamable",
        "type",
    ];

    /// Shorthand map-form entry: the value string is the parameter type.
    pub(crate) fn of_type(ty: String) -> Option<Self> {
        Some(Parameter {
            r#type: Some(JsonValue::String(ty)),
            ..Parameter::default()
        })
    }

    /// Whether this parameter captures the tool's standard output stream.
    pub fn is_stdout(&self) -> bool {
        matches!(
            self.r#type.as_ref().and_then(JsonValue::as_str),
            Some("stdout")
        )
    }

    fn input_field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "default" => json_field(&self.default),
            "doc" => str_field(&self.doc),
            "format" => json_field(&self.format),
            "id" => str_field(&self.id),
            "inputBinding" => match &self.input_binding {
                Some(binding) => Value::Record(Record::InputBinding(binding)),
                None => Value::Null,
            },
            "label" => str_field(&self.label),
            "secondaryFiles" => json_field(&self.secondary_files),
            "streamable" => bool_field(self.streamable),
            "type" => json_field(&self.r#type),
            _ => return None,
        };
        Some(value)
    }

    fn output_field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "doc" => str_field(&self.doc),
            "format" => json_field(&self.format),
            "id" => str_field(&self.id),
            "label" => str_field(&self.label),
            "outputBinding" => match &self.output_binding {
                Some(binding) => Value::Record(Record::OutputBinding(binding)),
                None => Value::Null,
            },
            "outputSource" => json_field(&self.output_source),
            "secondaryFiles" => json_field(&self.secondary_files),
            "streamable" => bool_field(self.streamable),
            "type" => json_field(&self.r#type),
            _ => return None,
        };
        Some(value)
    }
}

/// Binding of an input parameter onto the command line.
///
/// `position` is memoized: the parser records an explicitly declared
/// ordering position, and the first traversal through an `inputBinding`
/// field fills the default `0` into an undeclared one. Later visits see
/// the filled value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandLineBinding {
    #[serde(deserialize_with = "parser::position_cell")]
    position: OnceCell<i64>,
    pub prefix: Option<String>,
    pub separate: Option<bool>,
    pub item_separator: Option<String>,
    pub value_from: Option<String>,
    pub shell_quote: Option<bool>,
    pub load_contents: Option<bool>,
}

impl CommandLineBinding {
    pub const FIELDS: &'static [&'static str] = &[
        "itemSeparator",
        "loadContents",
        "position",
        "prefix",
        "separate",
        "shellQuote",
        "valueFrom",
    ];

    /// The ordering position, if declared or already default-filled.
    pub fn position(&self) -> Option<i64> {
        self.position.get().copied()
    }

    /// Fill the default ordering position on first traversal; idempotent.
    pub fn fill_default_position(&self) -> i64 {
        *self.position.get_or_init(|| 0)
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "itemSeparator" => str_field(&self.item_separator),
            "loadContents" => bool_field(self.load_contents),
            "position" => match self.position.get() {
                Some(position) => Value::Int(*position),
                None => Value::Null,
            },
            "prefix" => str_field(&self.prefix),
            "separate" => bool_field(self.separate),
            "shellQuote" => bool_field(self.shell_quote),
            "valueFrom" => str_field(&self.value_from),
            _ => return None,
        };
        Some(value)
    }
}

/// Binding that describes where an output parameter's files come from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandOutputBinding {
    pub glob: Option<String>,
    pub load_contents: Option<bool>,
    pub output_eval: Option<String>,
}

impl CommandOutputBinding {
    pub const FIELDS: &'static [&'static str] = &["glob", "loadContents", "outputEval"];

    fn field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "glob" => str_field(&self.glob),
            "loadContents" => bool_field(self.load_contents),
            "outputEval" => str_field(&self.output_eval),
            _ => return None,
        };
        Some(value)
    }
}

/// A single step of a workflow. Step wiring (`run`, `in`, `out`, scatter)
/// is opaque to the query engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowStep {
    pub id: Option<String>,
    pub label: Option<String>,
    pub doc: Option<String>,
    pub run: Option<JsonValue>,
    #[serde(rename = "in")]
    pub in_: Option<JsonValue>,
    pub out: Option<JsonValue>,
    pub requirements: Option<JsonValue>,
    pub hints: Option<JsonValue>,
    pub scatter: Option<JsonValue>,
    pub scatter_method: Option<String>,
}

impl WorkflowStep {
    pub const FIELDS: &'static [&'static str] = &[
        "doc",
        "hints",
        "id",
        "in",
        "label",
        "out",
        "requirements",
        "run",
        "scatter",
        "scatterMethod",
    ];

    fn field(&self, name: &str) -> Option<Value<'_>> {
        let value = match name {
            "doc" => str_field(&self.doc),
            "hints" => json_field(&self.hints),
            "id" => str_field(&self.id),
            "in" => json_field(&self.in_),
            "label" => str_field(&self.label),
            "out" => json_field(&self.out),
            "requirements" => json_field(&self.requirements),
            "run" => json_field(&self.run),
            "scatter" => json_field(&self.scatter),
            "scatterMethod" => str_field(&self.scatter_method),
            _ => return None,
        };
        Some(value)
    }
}

/// A borrowed reference to one record node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Tool(&'a CommandLineTool),
    Workflow(&'a Workflow),
    Input(&'a Parameter),
    Output(&'a Parameter),
    InputBinding(&'a CommandLineBinding),
    OutputBinding(&'a CommandOutputBinding),
    Step(&'a WorkflowStep),
}

impl<'a> Record<'a> {
    /// The record's statically declared field table.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Record::Tool(_) => CommandLineTool::FIELDS,
            Record::Workflow(_) => Workflow::FIELDS,
            Record::Input(_) => Parameter::INPUT_FIELDS,
            Record::Output(_) => Parameter::OUTPUT_FIELDS,
            Record::InputBinding(_) => CommandLineBinding::FIELDS,
            Record::OutputBinding(_) => CommandOutputBinding::FIELDS,
            Record::Step(_) => WorkflowStep::FIELDS,
        }
    }

    /// Look up a declared field.
    ///
    /// `None` means the name is not in this record's field table; a
    /// declared-but-unset field answers `Value::Null`.
    pub fn field(self, name: &str) -> Option<Value<'a>> {
        match self {
            Record::Tool(tool) => tool.field(name),
            Record::Workflow(workflow) => workflow.field(name),
            Record::Input(parameter) => parameter.input_field(name),
            Record::Output(parameter) => parameter.output_field(name),
            Record::InputBinding(binding) => binding.field(name),
            Record::OutputBinding(binding) => binding.field(name),
            Record::Step(step) => step.field(name),
        }
    }
}

/// A borrowed reference to one of the identifier-addressable lists.
#[derive(Debug, Clone, Copy)]
pub enum RecordList<'a> {
    Inputs(&'a [Parameter]),
    Outputs(&'a [Parameter]),
    Steps(&'a [WorkflowStep]),
}

impl<'a> RecordList<'a> {
    pub fn len(self) -> usize {
        match self {
            RecordList::Inputs(items) | RecordList::Outputs(items) => items.len(),
            RecordList::Steps(items) => items.len(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Positional access.
    pub fn get(self, index: usize) -> Option<Record<'a>> {
        match self {
            RecordList::Inputs(items) => items.get(index).map(Record::Input),
            RecordList::Outputs(items) => items.get(index).map(Record::Output),
            RecordList::Steps(items) => items.get(index).map(Record::Step),
        }
    }

    /// First element whose id basename equals `name`, in list order.
    pub fn find(self, name: &str) -> Option<Record<'a>> {
        match self {
            RecordList::Inputs(items) => items
                .iter()
                .find(|p| id_matches(&p.id, name))
                .map(Record::Input),
            RecordList::Outputs(items) => items
                .iter()
                .find(|p| id_matches(&p.id, name))
                .map(Record::Output),
            RecordList::Steps(items) => items
                .iter()
                .find(|s| id_matches(&s.id, name))
                .map(Record::Step),
        }
    }

    /// Full identifiers of every element that declares one, in list order.
    pub fn ids(self) -> Vec<&'a str> {
        match self {
            RecordList::Inputs(items) | RecordList::Outputs(items) => {
                items.iter().filter_map(|p| p.id.as_deref()).collect()
            }
            RecordList::Steps(items) => items.iter().filter_map(|s| s.id.as_deref()).collect(),
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Record<'a>> {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

/// A value reached by traversal: a scalar, an opaque JSON leaf, a record,
/// or a list of records.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    /// A declared field with no value set.
    Null,
    Str(&'a str),
    Int(i64),
    Bool(bool),
    /// A list of strings, e.g. a base command's argv form.
    StrList(&'a [String]),
    /// An opaque subtree carried verbatim from the document.
    Json(&'a JsonValue),
    Record(Record<'a>),
    Records(RecordList<'a>),
}

/// Final segment of an identifier after any `/` or `#` separator.
///
/// Identifier lookups always compare against this basename, never the full
/// id, so `file:///wf.cwl#main/input` answers to `input`.
pub fn id_basename(id: &str) -> &str {
    id.rsplit(['/', '#']).next().unwrap_or(id)
}

fn id_matches(id: &Option<String>, name: &str) -> bool {
    id.as_deref().is_some_and(|id| id_basename(id) == name)
}

fn str_field(value: &Option<String>) -> Value<'_> {
    match value {
        Some(text) => Value::Str(text),
        None => Value::Null,
    }
}

fn json_field(value: &Option<JsonValue>) -> Value<'_> {
    match value {
        Some(json) => Value::Json(json),
        None => Value::Null,
    }
}

fn bool_field(value: Option<bool>) -> Value<'static> {
    match value {
        Some(flag) => Value::Bool(flag),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_basename() {
        assert_eq!(id_basename("input"), "input");
        assert_eq!(id_basename("echo.cwl#input"), "input");
        assert_eq!(id_basename("file:///tmp/wf.cwl#main/input"), "input");
        assert_eq!(id_basename("steps/align"), "align");
    }

    #[test]
    fn test_base_command_argv_widening() {
        let line = BaseCommand::Line("echo".to_string());
        assert_eq!(line.as_argv(), ["echo".to_string()]);

        let argv = BaseCommand::Argv(vec!["tar".to_string(), "xf".to_string()]);
        assert_eq!(argv.as_argv().len(), 2);
    }

    #[test]
    fn test_position_fill_is_idempotent() {
        let binding = CommandLineBinding::default();
        assert_eq!(binding.position(), None);
        assert_eq!(binding.fill_default_position(), 0);
        assert_eq!(binding.position(), Some(0));
        // A second fill must not overwrite the memoized value.
        assert_eq!(binding.fill_default_position(), 0);
    }

    #[test]
    fn test_field_tables_are_sorted_and_closed() {
        for table in [
            CommandLineTool::FIELDS,
            Workflow::FIELDS,
            Parameter::INPUT_FIELDS,
            Parameter::OUTPUT_FIELDS,
            CommandLineBinding::FIELDS,
            CommandOutputBinding::FIELDS,
            WorkflowStep::FIELDS,
        ] {
            let mut sorted = table.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, table);
        }
    }

    #[test]
    fn test_unknown_field_is_not_declared() {
        let tool = CommandLineTool::default();
        assert!(Record::Tool(&tool).field("nonexistent").is_none());
        // Declared but unset answers Null rather than failing.
        assert!(matches!(
            Record::Tool(&tool).field("stdin"),
            Some(Value::Null)
        ));
    }
}
