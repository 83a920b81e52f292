//! `errsplit --input <FILE> <OUTPUT_DIR>` – rebuild shards from a saved report.

use anyhow::Result;
use std::path::Path;

use crate::cli::Cli;

pub fn run_offline(cli: &Cli, output_dir: &Path, input: &Path) -> Result<i32> {
    let cfg = cli.resolve_config()?;
    let summary = errsplit_core::split_file(output_dir, input, &cfg)?;
    tracing::debug!(
        "split {} into {}: {} records, {} shards, {} stale removed",
        input.display(),
        output_dir.display(),
        summary.records,
        summary.shards,
        summary.removed
    );
    Ok(0)
}
