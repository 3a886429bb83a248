//! Per-invocation execution environment supplied to queries.
//!
//! Built once by the caller (the CLI, a test harness) and handed to the
//! query engine read-only; no component mutates it.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

/// Runtime directory settings for a single query.
#[derive(Debug, Clone, Default)]
pub struct RuntimeDirs {
    /// Output directory, absolute when set.
    pub outdir: Option<PathBuf>,
    /// Temporary directory, absolute when set.
    pub tmpdir: Option<PathBuf>,
}

/// Read-only context for a query: runtime directories plus bound argument
/// values. Arguments are opaque to the query engine.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub runtime: RuntimeDirs,
    pub args: IndexMap<String, JsonValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.runtime.outdir = Some(outdir.into());
        self
    }

    pub fn with_tmpdir(mut self, tmpdir: impl Into<PathBuf>) -> Self {
        self.runtime.tmpdir = Some(tmpdir.into());
        self
    }

    /// Join `name` onto the configured output directory, or return it bare
    /// when no output directory is set.
    pub fn in_outdir(&self, name: &str) -> String {
        match &self.runtime.outdir {
            Some(dir) => dir.join(name).to_string_lossy().into_owned(),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_outdir_joins_when_configured() {
        let env = Environment::new().with_outdir("/work/out");
        assert_eq!(env.in_outdir("report.txt"), "/work/out/report.txt");
    }

    #[test]
    fn test_in_outdir_bare_without_outdir() {
        let env = Environment::new();
        assert_eq!(env.in_outdir("report.txt"), "report.txt");
    }

    #[test]
    fn test_absolute_name_wins_over_outdir() {
        let env = Environment::new().with_outdir("/work/out");
        assert_eq!(env.in_outdir("/data/report.txt"), "/data/report.txt");
    }
}
