//! Instantiation of runtime placeholders in filename and glob strings.
//!
//! Only the two runtime directory parameters are recognized. Any other
//! `$(...)` placeholder, and a recognized one whose directory is unset,
//! stays in the string verbatim; the output locator treats such a pattern
//! as dynamic.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::env::Environment;

static RUNTIME_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\(runtime\.(outdir|tmpdir)\)").unwrap());

/// Substitute `$(runtime.outdir)` / `$(runtime.tmpdir)` into `pattern`.
pub fn instantiate(pattern: &str, env: &Environment) -> String {
    RUNTIME_PARAM
        .replace_all(pattern, |caps: &Captures| {
            let dir = match &caps[1] {
                "outdir" => env.runtime.outdir.as_ref(),
                _ => env.runtime.tmpdir.as_ref(),
            };
            match dir {
                Some(path) => path.to_string_lossy().into_owned(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_configured_dirs() {
        let env = Environment::new()
            .with_outdir("/work/out")
            .with_tmpdir("/work/tmp");
        assert_eq!(
            instantiate("$(runtime.outdir)/report.txt", &env),
            "/work/out/report.txt"
        );
        assert_eq!(
            instantiate("$(runtime.tmpdir)/scratch", &env),
            "/work/tmp/scratch"
        );
    }

    #[test]
    fn test_unset_dir_stays_verbatim() {
        let env = Environment::new().with_outdir("/work/out");
        assert_eq!(
            instantiate("$(runtime.tmpdir)/scratch", &env),
            "$(runtime.tmpdir)/scratch"
        );
    }

    #[test]
    fn test_unknown_placeholder_stays_verbatim() {
        let env = Environment::new().with_outdir("/work/out");
        assert_eq!(
            instantiate("$(inputs.sample).bam", &env),
            "$(inputs.sample).bam"
        );
    }

    #[test]
    fn test_plain_string_passes_through() {
        let env = Environment::new();
        assert_eq!(instantiate("report.txt", &env), "report.txt");
    }
}
