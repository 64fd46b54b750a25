//! Deskhand - command-dispatch server for desktop input and capture.
//!
//! Loads configuration, registers the desktop capabilities and serves the
//! router over HTTP.

mod cli;
mod cmd_capabilities;
mod cmd_check;
mod register;
mod server;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use deskhand_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::cmd_capabilities::list_capabilities;
use crate::cmd_check::check_environment;
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, source) = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    match &source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Run { host, port }) => run_server(config, host, port).await,
        Some(Commands::Capabilities { format }) => list_capabilities(&config, &format),
        Some(Commands::Check) => check_environment(&config).await,
    }
}

/// Discover and validate configuration. Warnings go to stderr since the
/// logging level itself comes from the config.
fn load_config(
    explicit: Option<&Path>,
) -> Result<(Config, Option<PathBuf>), Box<dyn std::error::Error>> {
    let (config, source) = ConfigLoader::discover(explicit)?;
    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        eprintln!("config warning: {}: {}", warning.path, warning.message);
    }
    Ok((config, source))
}
