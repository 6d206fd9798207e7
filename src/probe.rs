//! Asks the version-control tool for a describe string and a branch name.
//!
//! Every failure on the way (tool missing, no repository, a command that
//! exits non-zero) turns into an absent value. Nothing here fails the build.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::Config;
use crate::env::BuildEnvironment;
use crate::locate::{ProgramLocator, SystemLocator};
use crate::runner::{ProcessRunner, ToolRunner};
use crate::status::StatusLine;

/// A trimmed, non-empty line of tool output, or absent.
pub type ProbeResult = Option<String>;

/// What a configure pass found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub tool: Option<PathBuf>,
    pub describe: ProbeResult,
    pub branch: ProbeResult,
}

pub struct VersionProbe<L = SystemLocator, R = ProcessRunner> {
    config: Config,
    source_root: PathBuf,
    locator: L,
    runner: R,
}

impl VersionProbe {
    /// Probe `source_root` using `PATH` lookup and real child processes.
    pub fn new<P: AsRef<Path>>(config: Config, source_root: P) -> Self {
        let locator = match &config.tool_path {
            Some(path) => SystemLocator::pinned(path),
            None => SystemLocator::new(),
        };
        Self::with_collaborators(config, source_root, locator, ProcessRunner)
    }
}

impl<L: ProgramLocator, R: ToolRunner> VersionProbe<L, R> {
    pub fn with_collaborators<P: AsRef<Path>>(config: Config, source_root: P, locator: L, runner: R) -> Self {
        Self {
            config,
            source_root: source_root.as_ref().to_path_buf(),
            locator,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn locate_tool(&self, name: &str) -> Option<PathBuf> {
        let found = self.locator.locate(name);
        match &found {
            Some(path) => debug!("Found {} at {}", name, path.display()),
            None => debug!("Program {} not found, skipping version probe", name),
        }
        found
    }

    /// Whether the metadata marker sits directly under `root`.
    pub fn has_repository_metadata(&self, root: &Path) -> bool {
        let present = root.join(&self.config.metadata_marker).exists();
        if !present {
            debug!("Can't find {} in {}", self.config.metadata_marker, root.display());
        }
        present
    }

    pub fn run_tool(&self, tool: &Path, argv: &[String]) -> ProbeResult {
        match self.runner.run(tool, argv, &self.source_root) {
            Ok(stdout) => normalize(&stdout),
            Err(e) => {
                debug!("{} {}: {}", tool.display(), argv.join(" "), e);
                None
            }
        }
    }

    pub fn get_describe_version(&self, tool: &Path) -> ProbeResult {
        if !self.has_repository_metadata(&self.source_root) {
            return None;
        }
        self.run_tool(tool, &self.config.describe_args)
    }

    pub fn get_branch_name(&self, tool: &Path) -> ProbeResult {
        if !self.has_repository_metadata(&self.source_root) {
            return None;
        }
        self.run_tool(tool, &self.config.branch_args)
    }

    /// Probe once and record both values in `env`.
    ///
    /// When the tool cannot be found `env` is left untouched. Otherwise both
    /// keys are written, possibly as absent.
    pub fn configure<W: Write>(&self, env: &mut BuildEnvironment, status: &mut StatusLine<W>) -> ProbeOutcome {
        let Some(tool) = self.locate_tool(&self.config.tool) else {
            return ProbeOutcome::default();
        };

        let has_metadata = self.has_repository_metadata(&self.source_root);
        let query = |args: &[String]| if has_metadata { self.run_tool(&tool, args) } else { None };

        // run before start() so log output never lands inside a status line
        let describe = query(&self.config.describe_args);
        env.set(&self.config.version_key, describe.clone());
        status.start("Git commit hash");
        status.end(describe.as_deref());

        let branch = query(&self.config.branch_args);
        env.set(&self.config.branch_key, branch.clone());
        status.start("Git branch");
        status.end(branch.as_deref());

        if has_metadata && self.config.rerun_if_changed {
            self.watch_metadata(env);
        }

        ProbeOutcome {
            tool: Some(tool),
            describe,
            branch,
        }
    }

    fn watch_metadata(&self, env: &mut BuildEnvironment) {
        let marker = self.source_root.join(&self.config.metadata_marker);
        if marker.is_dir() {
            for entry in ["HEAD", "index", "refs"] {
                env.watch(marker.join(entry));
            }
        } else {
            // worktrees and submodules point elsewhere through a .git file
            env.watch(marker);
        }
    }
}

/// Trim tool output; blank output is absent.
pub fn normalize(output: &str) -> ProbeResult {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
