//! CLI module for sensorfeed
//!
//! Provides command-line interface for:
//! - serve: Load configuration, install logging and run the HTTP server
//! - config: Print the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{load_config, run, run_command, serve, show_config, DEFAULT_CONFIG_FILE};
pub use errors::{CliError, CliErrorCode, CliResult};
