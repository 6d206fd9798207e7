use gitversion::config::Config;
use gitversion::env::{BuildEnvironment, OutputFormat};
use gitversion::locate::ProgramLocator;
use gitversion::probe::VersionProbe;
use gitversion::runner::{RunError, ToolRunner};
use gitversion::status::StatusLine;
use serial_test::serial;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Found;

impl ProgramLocator for Found {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(name))
    }
}

struct NotFound;

impl ProgramLocator for NotFound {
    fn locate(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

/// Replies like git would in a tagged checkout on `main`, counting calls.
#[derive(Default)]
struct ScriptedGit {
    calls: Cell<usize>,
    fail_describe: bool,
}

impl ToolRunner for &ScriptedGit {
    fn run(&self, program: &Path, args: &[String], _cwd: &Path) -> Result<String, RunError> {
        self.calls.set(self.calls.get() + 1);
        match args.first().map(String::as_str) {
            Some("describe") if self.fail_describe => Err(RunError::ExitStatus {
                program: program.display().to_string(),
                code: Some(128),
                stderr: "fatal: not a git repository".to_string(),
            }),
            Some("describe") => Ok("v1.2.3-4-gabc1234\n".to_string()),
            Some("rev-parse") => Ok("main\n".to_string()),
            _ => Ok(String::new()),
        }
    }
}

fn checkout() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join(".git")).unwrap();
    temp_dir
}

fn probe_with<L: ProgramLocator>(root: &Path, locator: L, git: &ScriptedGit) -> BuildEnvironment {
    let probe = VersionProbe::with_collaborators(Config::default(), root, locator, git);
    let mut env = BuildEnvironment::new();
    probe.configure(&mut env, &mut StatusLine::silent(Vec::new()));
    env
}

#[test]
fn test_describe_string_lands_in_git_version() {
    let root = checkout();
    let git = ScriptedGit::default();

    let env = probe_with(root.path(), Found, &git);

    assert_eq!(env.get("GIT_VERSION"), Some("v1.2.3-4-gabc1234"));
}

#[test]
fn test_branch_name_lands_in_git_branch() {
    let root = checkout();
    let git = ScriptedGit::default();

    let env = probe_with(root.path(), Found, &git);

    assert_eq!(env.get("GIT_BRANCH"), Some("main"));
}

#[test]
fn test_no_tool_means_no_keys_and_no_calls() {
    let root = checkout();
    let git = ScriptedGit::default();

    let env = probe_with(root.path(), NotFound, &git);

    assert!(env.is_empty());
    assert_eq!(git.calls.get(), 0);
}

#[test]
fn test_no_metadata_means_absent_keys() {
    let root = TempDir::new().unwrap();
    let git = ScriptedGit::default();

    let env = probe_with(root.path(), Found, &git);

    assert!(env.contains("GIT_VERSION"));
    assert!(env.contains("GIT_BRANCH"));
    assert_eq!(env.get("GIT_VERSION"), None);
    assert_eq!(env.get("GIT_BRANCH"), None);
    assert_eq!(git.calls.get(), 0);
}

#[test]
fn test_failing_describe_only_loses_version() {
    let root = checkout();
    let git = ScriptedGit {
        fail_describe: true,
        ..ScriptedGit::default()
    };

    let env = probe_with(root.path(), Found, &git);

    assert_eq!(env.get("GIT_VERSION"), None);
    assert_eq!(env.get("GIT_BRANCH"), Some("main"));
    assert_eq!(git.calls.get(), 2);
}

#[test]
fn test_cargo_output_for_probed_checkout() {
    let root = checkout();
    let git = ScriptedGit::default();

    let env = probe_with(root.path(), Found, &git);
    let mut out = Vec::new();
    env.write_to(OutputFormat::Cargo, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("cargo:rustc-env=GIT_VERSION=v1.2.3-4-gabc1234\n"));
    assert!(out.contains("cargo:rustc-env=GIT_BRANCH=main\n"));
    assert!(out.contains("cargo:rerun-if-changed="));
    assert!(out.contains("HEAD"));
}

#[test]
fn test_config_partial_loading() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial-config.yml");

    fs::write(&config_path, "version_key: \"BUILD_VERSION\"\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.version_key, "BUILD_VERSION");
    // These should be defaults
    assert_eq!(config.tool, "git");
    assert_eq!(config.branch_key, "GIT_BRANCH");
    assert_eq!(config.metadata_marker, ".git");
}

/// Run `f` with the working directory set to `dir`, restoring it afterwards.
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir).unwrap();
    let result = f();
    std::env::set_current_dir(original_dir).unwrap();
    result
}

#[test]
#[serial]
fn test_config_load_fallback_to_defaults() {
    let temp_dir = TempDir::new().unwrap();

    let config = in_dir(temp_dir.path(), || Config::load(None)).unwrap();

    let defaults = Config::default();
    assert_eq!(config.tool, defaults.tool);
    assert_eq!(config.tool_path, defaults.tool_path);
    assert_eq!(config.version_key, defaults.version_key);
    assert_eq!(config.branch_key, defaults.branch_key);
    assert_eq!(config.describe_args, defaults.describe_args);
    assert_eq!(config.branch_args, defaults.branch_args);
}

#[test]
#[serial]
fn test_config_load_picks_up_cwd_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("gitversion.yml"),
        "version_key: \"CWD_VERSION\"\nrerun_if_changed: false\n",
    )
    .unwrap();

    let config = in_dir(temp_dir.path(), || Config::load(None)).unwrap();

    assert_eq!(config.version_key, "CWD_VERSION");
    assert!(!config.rerun_if_changed);
    assert_eq!(config.branch_key, "GIT_BRANCH");
}

#[test]
#[serial]
fn test_config_load_skips_invalid_cwd_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("gitversion.yml"), "tool: [").unwrap();

    let result = in_dir(temp_dir.path(), || Config::load(None));

    let config = result.expect("Invalid implicit config should fall back to defaults");
    assert_eq!(config.tool, "git");
    assert_eq!(config.version_key, "GIT_VERSION");
}
