//! `errsplit <OUTPUT_DIR>` – refresh shards from the remote report.

use anyhow::Result;
use errsplit_core::Outcome;
use std::path::Path;

use crate::cli::{http_status_exit_code, Cli, EXIT_NOT_MODIFIED};

pub fn run_split(cli: &Cli, output_dir: &Path) -> Result<i32> {
    let cfg = cli.resolve_config()?;

    match errsplit_core::run(output_dir, &cfg) {
        Ok(Outcome::NotModified { .. }) => Ok(EXIT_NOT_MODIFIED),
        Ok(Outcome::Updated { etag, summary }) => {
            tracing::debug!(
                "updated {} to {}: {} records, {} shards",
                output_dir.display(),
                etag,
                summary.records,
                summary.shards
            );
            Ok(0)
        }
        Err(err) if err.is_http_status() => {
            tracing::error!("{}", err);
            Ok(http_status_exit_code(cli.fail_on_http_error))
        }
        Err(err) => Err(err.into()),
    }
}
