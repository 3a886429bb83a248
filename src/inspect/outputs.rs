//! Output file location (`ls(.outputs.<id>)`).

use uuid::Uuid;

use crate::env::Environment;
use crate::error::CwlError;
use crate::expr;
use crate::inspect::path;
use crate::tree::{Document, Record, Value};

/// Where an output field's files land: one concrete path, or the ordered
/// matches of a glob pattern (possibly none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(String),
    Files(Vec<String>),
}

/// Determine the file(s) denoted by the output field at `output_path`.
///
/// A `stdout`-typed output names the tool's declared `stdout` file, or a
/// randomized placeholder when none is declared; the name has runtime
/// placeholders instantiated and is joined with the configured output
/// directory. Any other output requires an `outputBinding`: a glob
/// pattern free of metacharacters is expanded against the filesystem
/// (failed or empty expansion is an empty list, not an error), while a
/// pattern still carrying metacharacters is answered verbatim as a single
/// dynamic path.
pub fn ls_outputs(
    doc: &Document,
    output_path: &str,
    env: &Environment,
) -> Result<Location, CwlError> {
    let output = match path::resolve(doc, output_path)? {
        Value::Record(Record::Output(output)) => output,
        _ => return Err(CwlError::invalid_path(output_path)),
    };

    if output.is_stdout() {
        return Ok(Location::File(stdout_target(doc, env)));
    }

    let binding = output
        .output_binding
        .as_ref()
        .ok_or_else(|| CwlError::unsupported_output(output_path))?;

    match &binding.glob {
        Some(pattern) => Ok(locate_glob(pattern, env)),
        // A binding that names no files locates nothing.
        None => Ok(Location::Files(Vec::new())),
    }
}

fn stdout_target(doc: &Document, env: &Environment) -> String {
    let declared = match doc {
        Document::CommandLineTool(tool) => tool.stdout.as_deref(),
        Document::Workflow(_) => None,
    };
    let filename = match declared {
        Some(name) => expr::instantiate(name, env),
        None => placeholder_stdout_name(),
    };
    env.in_outdir(&filename)
}

/// Stand-in filename for a tool that captures stdout without naming the
/// file, mirroring the runner behavior of picking a random one.
fn placeholder_stdout_name() -> String {
    format!("{}.stdout", Uuid::new_v4())
}

fn locate_glob(pattern: &str, env: &Environment) -> Location {
    let instantiated = expr::instantiate(pattern, env);
    if glob::Pattern::escape(&instantiated) != instantiated {
        // Metacharacters survived instantiation: a single dynamic path,
        // not something to expand here.
        return Location::File(instantiated);
    }

    let full = env.in_outdir(&instantiated);
    let matches = match glob::glob(&full) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .map(|entry| entry.to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    Location::Files(matches)
}
