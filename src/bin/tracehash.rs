//! Tracehash CLI Binary
//!
//! Fingerprints the paths given as arguments, or one path per stdin line.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::process;
use tracehash::cli::{map_error, Cli, RunContext};
use tracehash::config::ConfigLoader;
use tracehash::logging::{init_logging, LoggingConfig};
use tracing::{debug, error, info};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    let workspace = std::env::current_dir().context("Failed to read current directory")?;

    let logging_config = build_logging_config(&cli, &workspace);
    init_logging(Some(&logging_config)).context("Failed to initialize logging")?;

    info!("Tracehash CLI starting");
    debug!(
        global_config = ?ConfigLoader::global_config_path(),
        workspace = %workspace.display(),
        "Resolving configuration"
    );

    let context = match RunContext::new(&cli, &workspace) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            anyhow::bail!(map_error(&e));
        }
    };

    if cli.print_config {
        print!("{}", context.config().to_toml()?);
        return Ok(0);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let summary = match context.execute(stdin.lock(), &mut stdout, &mut stderr) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            anyhow::bail!(map_error(&e));
        }
    };
    stdout.flush().context("Failed to flush stdout")?;

    // Explicit path arguments report failure through the exit status
    if !cli.paths.is_empty() && summary.failures > 0 {
        return Ok(1);
    }
    Ok(0)
}

/// Build logging configuration from CLI args and config file
fn build_logging_config(cli: &Cli, workspace: &std::path::Path) -> LoggingConfig {
    if !cli.verbose {
        return LoggingConfig::off();
    }

    let mut config = ConfigLoader::load(workspace, cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
