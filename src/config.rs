use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub tool: String,
    pub tool_path: Option<PathBuf>,
    pub metadata_marker: String,
    pub version_key: String,
    pub branch_key: String,
    pub describe_args: Vec<String>,
    pub branch_args: Vec<String>,
    pub rerun_if_changed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: "git".to_string(),
            tool_path: None,
            metadata_marker: ".git".to_string(),
            version_key: "GIT_VERSION".to_string(),
            branch_key: "GIT_BRANCH".to_string(),
            describe_args: vec!["describe".to_string(), "--dirty".to_string(), "--always".to_string()],
            branch_args: vec!["rev-parse".to_string(), "--abbrev-ref".to_string(), "HEAD".to_string()],
            rerun_if_changed: true,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Primary location ~/.config/gitversion/gitversion.yml, then ./gitversion.yml
        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("gitversion").join("gitversion.yml"));
        }
        candidates.push(PathBuf::from("gitversion.yml"));

        Ok(Self::load_first(&candidates))
    }

    /// First candidate that exists and parses; defaults when none does.
    pub fn load_first(candidates: &[PathBuf]) -> Self {
        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", candidate.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Self::default()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
