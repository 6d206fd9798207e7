use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use clap::ValueEnum;
use eyre::{Context, Result};
use serde::Serialize;

/// How the environment is written out for the next build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `cargo:rustc-env=KEY=VALUE` directives for a build script
    Cargo,
    /// `export KEY='VALUE'` lines for a shell
    Shell,
    /// YAML mapping, absent values as null
    Yaml,
}

/// Key/value store handed to the probe and read by later build steps.
///
/// A key is either unset, set to a value, or set but explicitly absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    #[serde(flatten)]
    values: BTreeMap<String, Option<String>>,
    #[serde(skip)]
    rerun_if_changed: Vec<PathBuf>,
}

impl BuildEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: Option<String>) {
        self.values.insert(key.to_string(), value);
    }

    /// The stored value; `None` for both unset and absent keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Paths Cargo should watch before rerunning the build script.
    pub fn watch(&mut self, path: PathBuf) {
        if !self.rerun_if_changed.contains(&path) {
            self.rerun_if_changed.push(path);
        }
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.rerun_if_changed
    }

    pub fn write_to<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<()> {
        match format {
            OutputFormat::Cargo => {
                for (key, value) in self.iter() {
                    if let Some(value) = value {
                        writeln!(out, "cargo:rustc-env={}={}", key, value)?;
                    }
                }
                for path in &self.rerun_if_changed {
                    writeln!(out, "cargo:rerun-if-changed={}", path.display())?;
                }
            }
            OutputFormat::Shell => {
                for (key, value) in self.iter() {
                    if let Some(value) = value {
                        writeln!(out, "export {}={}", key, shell_quote(value))?;
                    }
                }
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(self).context("Failed to serialize build environment")?;
                out.write_all(yaml.as_bytes())?;
            }
        }
        Ok(())
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
