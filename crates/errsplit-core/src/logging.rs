//! Logging init: plain stderr output, verbosity decided once at startup.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Name of the variable whose presence turns on debug output.
pub const DEBUG_ENV: &str = "DEBUG";

/// How much the run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only failures (HTTP status errors and fatal errors).
    #[default]
    Error,
    /// Tokens, shard opens and the run summary as well.
    Debug,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Error => "error",
            Verbosity::Debug => "debug",
        }
    }
}

/// Logging settings handed to the CLI instead of being read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub verbosity: Verbosity,
}

impl LogConfig {
    /// `DEBUG` set to anything (even empty) selects debug verbosity.
    pub fn from_env() -> Self {
        Self::from_debug_var(std::env::var_os(DEBUG_ENV).is_some())
    }

    pub fn from_debug_var(present: bool) -> Self {
        let verbosity = if present {
            Verbosity::Debug
        } else {
            Verbosity::Error
        };
        Self { verbosity }
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::new(self.verbosity.directive())
    }
}

/// Install the global subscriber writing bare messages to stderr.
/// Fails if a subscriber is already installed.
pub fn init_logging(cfg: &LogConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(cfg.env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("errsplit logging initialized at {:?}", cfg.verbosity);

    Ok(())
}
