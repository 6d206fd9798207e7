use clap::Parser;
use eyre::{Context, Result};
use log::{LevelFilter, info};

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use gitversion::cli::Cli;
use gitversion::config::Config;
use gitversion::env::BuildEnvironment;
use gitversion::probe::VersionProbe;
use gitversion::status::StatusLine;

fn setup_logging(verbose: bool) -> Result<()> {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .target(env_logger::Target::Stderr)
            .init();
        return Ok(());
    }

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gitversion")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("gitversion.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(tool) = &cli.tool {
        // a pinned path would ignore the name, so the flag overrides it too
        config.tool = tool.clone();
        config.tool_path = None;
    }

    info!("Probing {} in {}", config.tool, cli.source_root.display());

    let probe = VersionProbe::new(config, &cli.source_root);
    let mut env = BuildEnvironment::new();
    let mut status = if cli.quiet {
        StatusLine::silent(io::stderr())
    } else {
        StatusLine::new(io::stderr())
    };

    let outcome = probe.configure(&mut env, &mut status);
    info!(
        "Probe finished: describe={:?} branch={:?}",
        outcome.describe, outcome.branch
    );

    env.write_to(cli.format, out).context("Failed to write build environment")?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // no log file is not worth failing a build over
    setup_logging(cli.verbose).ok();

    run(&cli, &mut io::stdout().lock())
}
