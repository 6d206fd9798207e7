use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Why a tool invocation produced no usable output.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", exit_description(.code))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} wrote non-UTF-8 output")]
    Utf8 { program: String },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

/// Runs an external program and hands back its standard output.
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<String, RunError>;
}

/// Runs the program as a blocking child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[String], cwd: &Path) -> Result<String, RunError> {
        let name = program.display().to_string();

        // output() waits for the child and drops its handles before returning
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| RunError::Spawn {
                program: name.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RunError::ExitStatus {
                program: name,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| RunError::Utf8 { program: name })
    }
}
