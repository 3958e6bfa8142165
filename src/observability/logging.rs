//! Logging setup
//!
//! Installs a `tracing` fmt subscriber writing to stderr. `RUST_LOG` takes
//! precedence over the configured level.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Build the log filter for `level`, unless `RUST_LOG` is set
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level))
}

/// Filter used when `RUST_LOG` is absent
pub fn default_filter(level: &str) -> EnvFilter {
    let level = level.trim().to_lowercase();
    EnvFilter::try_new(format!("sensorfeed={level},tower_http={level}"))
        .unwrap_or_else(|_| EnvFilter::new("sensorfeed=info,tower_http=info"))
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_level() {
        let filter = default_filter("DEBUG");
        assert!(filter.to_string().contains("sensorfeed=debug"));
    }
}
