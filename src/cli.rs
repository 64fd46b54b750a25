//! CLI definitions for deskhand.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deskhand CLI.
#[derive(Parser)]
#[command(name = "deskhand")]
#[command(about = "Command-dispatch server for desktop capabilities")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to config/default.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host (overrides the config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List every registered capability operation
    Capabilities {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Probe each device backend once and report what is missing
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["deskhand"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_overrides() {
        let cli =
            Cli::try_parse_from(["deskhand", "run", "--host", "0.0.0.0", "-p", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["deskhand", "capabilities", "--config", "x.toml", "-f", "json"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Some(Commands::Capabilities { format }) => assert_eq!(format, "json"),
            _ => panic!("expected capabilities"),
        }
    }
}
