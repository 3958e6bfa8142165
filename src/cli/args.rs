//! CLI argument definitions using clap
//!
//! Commands:
//! - sensorfeed [serve] [--config <path>] [--host <host>] [--port <port>]
//! - sensorfeed config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sensorfeed - telemetry ingestion endpoint with a live feed
#[derive(Parser, Debug)]
#[command(name = "sensorfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the effective configuration and exit
    Config {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["sensorfeed"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from(["sensorfeed", "serve", "--port", "8081", "--host", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Some(Command::Serve { port, host, config }) => {
                assert_eq!(port, Some(8081));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(Cli::try_parse_from(["sensorfeed", "serve", "--port", "99999"]).is_err());
    }
}
