//! One split run.
//!
//! Read cached token → HEAD → compare → sweep old shards → streaming GET →
//! route lines → close shards → persist token. The token is written last, so
//! a run that fails anywhere before it is retried in full next time.

use crate::cache_token;
use crate::chunker::LineBuffer;
use crate::config::SplitConfig;
use crate::downloader;
use crate::error::SplitError;
use crate::fetch_head;
use crate::partition::{partition_reader, PartitionStats, Partitioner};
use crate::storage;
use std::fs::File;
use std::path::Path;

/// What a rebuild produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines routed into shards.
    pub records: u64,
    /// Shard files written.
    pub shards: usize,
    /// Shard files from the previous run that were deleted.
    pub removed: usize,
}

impl RunSummary {
    fn new(stats: PartitionStats, removed: usize) -> Self {
        Self {
            records: stats.records,
            shards: stats.shards,
            removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Remote `ETag` equals the cached one; nothing was touched.
    NotModified { etag: String },
    /// Shards were rebuilt and the token advanced to `etag`.
    Updated { etag: String, summary: RunSummary },
}

/// Bring `output_dir` up to date with the report at `cfg.url`.
pub fn run(output_dir: &Path, cfg: &SplitConfig) -> Result<Outcome, SplitError> {
    let cached = cache_token::read(output_dir);
    tracing::debug!("Cache Etag: {}", cached.as_deref().unwrap_or("<unset>"));

    let head = fetch_head::probe(&cfg.url, cfg)?;
    let etag = head.remote_token().to_string();
    tracing::debug!("Remote Etag: {}", etag);

    if cache_token::is_unchanged(cached.as_deref(), &etag) {
        tracing::debug!("No update needed");
        return Ok(Outcome::NotModified { etag });
    }

    let removed = storage::remove_shards(output_dir)?;
    let stats = fetch_and_partition(output_dir, cfg)?;
    cache_token::write(output_dir, &etag)?;

    let summary = RunSummary::new(stats, removed);
    tracing::debug!(
        "Wrote {} records into {} shards ({} stale removed)",
        summary.records,
        summary.shards,
        summary.removed
    );
    Ok(Outcome::Updated { etag, summary })
}

/// Stream the report straight from the transfer into shards.
fn fetch_and_partition(output_dir: &Path, cfg: &SplitConfig) -> Result<PartitionStats, SplitError> {
    let mut partitioner = Partitioner::new(output_dir);
    let mut lines = LineBuffer::new();

    let streamed = downloader::stream_get(&cfg.url, cfg, |chunk| {
        lines.push(chunk);
        while let Some(line) = lines.next_line() {
            partitioner.route(line)?;
        }
        Ok(())
    })
    .and_then(|()| match lines.finish() {
        Some(rest) => partitioner.route(rest),
        None => Ok(()),
    });

    match streamed {
        Ok(()) => partitioner.finish(),
        Err(e) => {
            partitioner.abandon();
            Err(e)
        }
    }
}

/// Rebuild `output_dir` from a saved report instead of the network.
/// The token sidecar is left alone.
pub fn split_file(output_dir: &Path, input: &Path, cfg: &SplitConfig) -> Result<RunSummary, SplitError> {
    let file = File::open(input)
        .map_err(|e| SplitError::io(format!("failed to open {}", input.display()), e))?;
    let removed = storage::remove_shards(output_dir)?;
    let stats = partition_reader(output_dir, file, cfg.chunk_size)?;
    Ok(RunSummary::new(stats, removed))
}
