//! Error types for CWL document loading and query evaluation.
//!
//! Every failure mode of the crate is a variant of [`CwlError`]. Errors are
//! fatal to the query being served: there is no retry or partial-result
//! path, callers report the error and exit non-zero.

use std::fmt;
use thiserror::Error;

/// Query forms the dispatcher recognizes but does not implement.
///
/// Kept as an explicit enum so callers can tell "not supported yet" apart
/// from "succeeded with an empty result".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unimplemented {
    /// `commandline` materialization for a CommandLineTool
    CommandLine,
    /// `commandline(<step>)` materialization for a Workflow step
    StepCommandLine,
    /// `ls(.outputs.<id>)` listing against a Workflow
    WorkflowOutputs,
    /// `ls(.steps.)` step-output listing
    StepOutputs,
}

impl fmt::Display for Unimplemented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unimplemented::CommandLine => "commandline materialization",
            Unimplemented::StepCommandLine => "step commandline materialization",
            Unimplemented::WorkflowOutputs => "output listing for a Workflow",
            Unimplemented::StepOutputs => "output listing for steps",
        };
        f.write_str(name)
    }
}

/// Main error type for document loading and query evaluation.
#[derive(Error, Debug)]
pub enum CwlError {
    /// A path segment did not resolve (bad index, unknown identifier,
    /// unknown field name). Carries the full requested path.
    #[error("no such field {path}")]
    FieldNotFound { path: String },

    /// The query string matches no recognized grammar form.
    #[error("unknown query: {query}")]
    UnknownQuery { query: String },

    /// A recognized query form invoked against the wrong document class.
    #[error("{message}")]
    Usage { message: String },

    /// A recognized but unimplemented query form.
    #[error("not yet implemented: {feature}")]
    NotImplemented { feature: Unimplemented },

    /// An `ls` path that does not resolve to an output field.
    #[error("not an output field: {path}")]
    InvalidPath { path: String },

    /// An output field with no binding to locate files from.
    #[error("output at {path} has no output binding")]
    UnsupportedOutput { path: String },

    /// The document source is not a well-formed CWL description.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The document file could not be read or parsed.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
}

impl CwlError {
    pub fn field_not_found(path: impl Into<String>) -> Self {
        CwlError::FieldNotFound { path: path.into() }
    }

    pub fn unknown_query(query: impl Into<String>) -> Self {
        CwlError::UnknownQuery {
            query: query.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        CwlError::Usage {
            message: message.into(),
        }
    }

    pub fn not_implemented(feature: Unimplemented) -> Self {
        CwlError::NotImplemented { feature }
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        CwlError::InvalidPath { path: path.into() }
    }

    pub fn unsupported_output(path: impl Into<String>) -> Self {
        CwlError::UnsupportedOutput { path: path.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        CwlError::Parse {
            message: message.into(),
        }
    }

    pub fn load(path: impl Into<String>, message: impl Into<String>) -> Self {
        CwlError::Load {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_carries_full_path() {
        let err = CwlError::field_not_found(".inputs.missing.label");
        assert_eq!(err.to_string(), "no such field .inputs.missing.label");
    }

    #[test]
    fn test_unknown_query_display() {
        let err = CwlError::unknown_query("frobnicate(.)");
        assert_eq!(err.to_string(), "unknown query: frobnicate(.)");
    }

    #[test]
    fn test_not_implemented_names_the_feature() {
        let err = CwlError::not_implemented(Unimplemented::StepOutputs);
        assert_eq!(
            err.to_string(),
            "not yet implemented: output listing for steps"
        );

        match err {
            CwlError::NotImplemented { feature } => {
                assert_eq!(feature, Unimplemented::StepOutputs);
            }
            _ => panic!("expected NotImplemented"),
        }
    }

    #[test]
    fn test_usage_error_display() {
        let err = CwlError::usage("commandline for a Workflow needs a step argument");
        assert_eq!(
            err.to_string(),
            "commandline for a Workflow needs a step argument"
        );
    }
}
