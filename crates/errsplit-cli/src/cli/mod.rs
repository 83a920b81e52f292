//! CLI for errsplit.

mod commands;

use anyhow::Result;
use clap::Parser;
use errsplit_core::config::{self, SplitConfig};
use errsplit_core::logging::{self, LogConfig};
use std::path::PathBuf;

use commands::{run_offline, run_split};

/// Missing or invalid arguments, and any unhandled error.
pub const EXIT_FAILURE: i32 = 1;
/// Non-200 HTTP status when `--fail-on-http-error` is given.
pub const EXIT_HTTP_STATUS: i32 = 2;
/// The report's `ETag` matches the cached one; nothing was done.
pub const EXIT_NOT_MODIFIED: i32 = 200;

/// Split the clint error report into one JSON-lines shard per source file.
#[derive(Debug, Parser)]
#[command(name = "errsplit", version)]
#[command(about = "Split the clint error report into per-file JSON shards", long_about = None)]
pub struct Cli {
    /// Directory receiving `<file>.json` shards and the `.errors` ETag marker.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report URL (overrides the config file).
    #[arg(long)]
    pub url: Option<String>,

    /// Read size in bytes for splitting the report into lines.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Config file to use instead of ~/.config/errsplit/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Split a saved report instead of downloading; the ETag marker is left alone.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Exit with status 2 when the server answers with a non-200 status.
    #[arg(long)]
    pub fail_on_http_error: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<SplitConfig> {
        let mut cfg = config::load(self.config.as_deref())?;
        if let Some(url) = &self.url {
            cfg.url = url.clone();
        }
        if let Some(n) = self.chunk_size {
            cfg.chunk_size = n;
        }
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }
}

/// Exit status after the server answered with a non-200 status. Compatible
/// mode reports the error but exits 0.
pub fn http_status_exit_code(fail_on_http_error: bool) -> i32 {
    if fail_on_http_error {
        EXIT_HTTP_STATUS
    } else {
        0
    }
}

/// Parse the process arguments, run, and return the exit status.
pub fn run_from_args(log: &LogConfig) -> i32 {
    if let Err(err) = logging::init_logging(log) {
        eprintln!("errsplit: {:#}", err);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures.
            return if err.use_stderr() { EXIT_FAILURE } else { 0 };
        }
    };

    dispatch(&cli)
}

/// Run a parsed command line. Nothing touches the filesystem before the
/// output directory argument is known to be present.
pub fn dispatch(cli: &Cli) -> i32 {
    let Some(output_dir) = cli.output_dir.as_deref() else {
        tracing::error!("missing output directory argument");
        return EXIT_FAILURE;
    };

    let result = match &cli.input {
        Some(input) => run_offline(cli, output_dir, input),
        None => run_split(cli, output_dir),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("errsplit error: {:#}", err);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests;
