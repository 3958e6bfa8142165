//! CLI command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::init_logging;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "sensorfeed.json";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match cli.command {
        Some(cmd) => run_command(cmd),
        None => serve(None, None, None),
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, host, port } => serve(config.as_deref(), host, port),
        Command::Config { config } => show_config(config.as_deref()),
    }
}

/// Resolve the effective configuration: defaults, file, then environment.
///
/// An explicitly given file must exist; the default file is optional.
pub fn load_config<F>(path: Option<&Path>, env: F) -> CliResult<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                ServerConfig::load(&default_path)?
            } else {
                ServerConfig::default()
            }
        }
    };
    config.apply_env_from(env)?;
    config.validate()?;
    Ok(config)
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path, |key| std::env::var(key).ok())?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    init_logging(&config.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        history_capacity = config.history_capacity,
        stream_interval_ms = config.stream_interval_ms,
        "starting sensorfeed"
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the effective configuration as JSON, with the API key masked
pub fn show_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path, |key| std::env::var(key).ok())?;
    let mut stdout = std::io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &redacted(config))?;
    writeln!(stdout)?;
    Ok(())
}

fn redacted(mut config: ServerConfig) -> ServerConfig {
    if config.api_key.is_some() {
        config.api_key = Some("***".to_string());
    }
    config
}
