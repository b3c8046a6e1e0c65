//! Logging init: `tracing` to stdout, filtered by `RUST_LOG` or the debug flag.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter used with `--debug`: traces target month, dates, probes and URLs.
const DEBUG_FILTER: &str = "info,pnd=debug,pnd_core=debug";
/// Filter without `--debug`: only problems.
const QUIET_FILTER: &str = "warn";

/// Directive string for the given debug setting.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Initialize logging to stdout. `RUST_LOG` wins over `debug` when set.
/// Fails if a global subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("debug logging enabled");
    Ok(())
}
