//! Query dispatch: classify a query string and route it.
//!
//! The dispatcher is the single entry point for the query language. It
//! recognizes the path form (a `.`-prefixed expression), the enumeration
//! form (`keys(...)`), the
//! command-line forms (`commandline`, `commandline(...)`) and the listing
//! forms (`ls(...)`), gates them by document class, and hands the work to
//! the resolver, enumerator, or locator.

pub mod keys;
pub mod outputs;
pub mod path;


use once_cell::sync::Lazy;
use regex::Regex;

use crate::env::Environment;
use crate::error::{CwlError, Unimplemented};
use crate::tree::{Document, Value};

pub use outputs::Location;

/// Result of a dispatched query.
#[derive(Debug, Clone)]
pub enum Inspection<'a> {
    /// A value addressed by a path expression.
    Value(Value<'a>),
    /// The identifiers / field names listed by a `keys(...)` query.
    Keys(Vec<String>),
    /// The file location(s) of an output field.
    Location(Location),
}

static KEYS_QUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^keys\((.+)\)$").unwrap());
static COMMANDLINE_QUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^commandline\((.+)\)$").unwrap());
static LS_QUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ls\((.+)\)$").unwrap());

/// Classify `pos` and route it to the right operation.
pub fn inspect<'a>(
    doc: &'a Document,
    pos: &str,
    env: &Environment,
) -> Result<Inspection<'a>, CwlError> {
    if pos.starts_with('.') {
        return Ok(Inspection::Value(path::resolve(doc, pos)?));
    }

    if let Some(caps) = KEYS_QUERY.captures(pos) {
        return Ok(Inspection::Keys(keys::keys(doc, &caps[1])?));
    }

    if pos == "commandline" {
        return match doc {
            Document::CommandLineTool(_) => {
                Err(CwlError::not_implemented(Unimplemented::CommandLine))
            }
            Document::Workflow(_) => Err(CwlError::usage(
                "commandline for a Workflow needs a step argument",
            )),
        };
    }

    if COMMANDLINE_QUERY.is_match(pos) {
        return match doc {
            Document::Workflow(_) => Err(CwlError::not_implemented(Unimplemented::StepCommandLine)),
            Document::CommandLineTool(_) => Err(CwlError::usage(
                "commandline for a CommandLineTool does not take an argument",
            )),
        };
    }

    if pos.starts_with("ls(.outputs.") {
        return match doc {
            Document::Workflow(_) => Err(CwlError::not_implemented(Unimplemented::WorkflowOutputs)),
            Document::CommandLineTool(_) => {
                let caps = LS_QUERY
                    .captures(pos)
                    .ok_or_else(|| CwlError::unknown_query(pos))?;
                Ok(Inspection::Location(outputs::ls_outputs(
                    doc, &caps[1], env,
                )?))
            }
        };
    }

    if pos.starts_with("ls(.steps.") {
        return match doc {
            Document::CommandLineTool(_) => Err(CwlError::usage(
                "ls on steps does not work for a CommandLineTool",
            )),
            Document::Workflow(_) => Err(CwlError::not_implemented(Unimplemented::StepOutputs)),
        };
    }

    Err(CwlError::unknown_query(pos))
}
