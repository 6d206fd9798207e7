//! Version stamping for builds: `git describe` and the current branch,
//! handed to the build as environment values.
//!
//! From a build script:
//!
//! ```no_run
//! fn main() -> eyre::Result<()> {
//!     gitversion::emit_cargo()?;
//!     Ok(())
//! }
//! ```
//!
//! and then `option_env!("GIT_VERSION")` in the crate being built.

pub mod cli;
pub mod config;
pub mod env;
pub mod locate;
pub mod probe;
pub mod runner;
pub mod status;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use eyre::Result;

pub use config::Config;
pub use env::{BuildEnvironment, OutputFormat};
pub use probe::{ProbeOutcome, ProbeResult, VersionProbe};

/// Probe the crate being built and print `cargo:` directives for it.
///
/// Only writing to stdout can fail; missing version data never does.
///
/// Cargo is told to rerun on changes to `.git/HEAD`, `.git/index` and
/// `.git/refs`, so editing a tracked file without touching the index
/// leaves a stale `-dirty` suffix until the next rerun.
pub fn emit_cargo() -> Result<ProbeOutcome> {
    let root = std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    emit_cargo_to(root, &mut io::stdout().lock())
}

/// Like [`emit_cargo`], for an explicit source root and output.
pub fn emit_cargo_to<P: AsRef<Path>, W: Write>(source_root: P, out: &mut W) -> Result<ProbeOutcome> {
    let probe = VersionProbe::new(Config::default(), source_root);
    let mut env = BuildEnvironment::new();
    let outcome = probe.configure(&mut env, &mut status::StatusLine::new(io::stderr()));

    env.write_to(OutputFormat::Cargo, out)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_emit_cargo_to_without_metadata_writes_no_values() {
        let temp_dir = TempDir::new().unwrap();

        let mut out = Vec::new();
        let outcome = emit_cargo_to(temp_dir.path(), &mut out).unwrap();

        assert!(outcome.describe.is_none());
        assert!(outcome.branch.is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn test_emit_cargo_to_only_writes_cargo_directives() {
        let mut out = Vec::new();
        let outcome = emit_cargo_to(env!("CARGO_MANIFEST_DIR"), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.lines().all(|line| line.starts_with("cargo:")));
        if let Some(version) = &outcome.describe {
            assert!(out.contains(&format!("cargo:rustc-env=GIT_VERSION={}\n", version)));
        }
        if let Some(branch) = &outcome.branch {
            assert!(out.contains(&format!("cargo:rustc-env=GIT_BRANCH={}\n", branch)));
        }
    }

    #[test]
    fn test_emit_cargo_succeeds() {
        assert!(emit_cargo().is_ok());
    }
}
