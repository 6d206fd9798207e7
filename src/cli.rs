use clap::Parser;
use std::path::PathBuf;

use crate::env::OutputFormat;

pub const VERSION: &str = match option_env!("GIT_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

#[derive(Parser)]
#[command(
    name = "gitversion",
    about = "Probe a git checkout for its describe string and branch and hand them to the build",
    version = VERSION,
    after_help = "Logs are written to: ~/.local/share/gitversion/logs/gitversion.log\n\nMissing git, a missing .git directory or a failing git command never fail the run;\nthe affected value is simply left out of the output."
)]
pub struct Cli {
    /// Source root to probe
    #[arg(short, long, default_value = ".", help = "Source root to probe")]
    pub source_root: PathBuf,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Cargo, help = "Output format")]
    pub format: OutputFormat,

    /// Name of the version-control program to look for (replaces a configured tool_path)
    #[arg(long, help = "Name of the version-control program to look for (replaces a configured tool_path)")]
    pub tool: Option<String>,

    /// Don't print status lines
    #[arg(short, long, help = "Don't print status lines")]
    pub quiet: bool,

    /// Log debug output to stderr instead of the log file
    #[arg(short, long, help = "Log debug output to stderr instead of the log file")]
    pub verbose: bool,
}
