//! Routing of report lines to shards.
//!
//! Each line is a JSON array whose first element names the source file the
//! lint error belongs to. Only that element is looked at; the raw line bytes
//! are what ends up in the shard.

use crate::chunker::ChunkedLines;
use crate::error::SplitError;
use crate::storage::ShardWriter;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Key (element 0) of one report line. `line_no` is 1-based, for errors.
pub fn record_key(line: &[u8], line_no: u64) -> Result<String, SplitError> {
    let value: Value = serde_json::from_slice(line).map_err(|source| SplitError::Json {
        line: line_no,
        source,
    })?;
    let invalid = |reason: &'static str| SplitError::InvalidRecord {
        line: line_no,
        reason,
    };
    let items = value.as_array().ok_or_else(|| invalid("record is not a JSON array"))?;
    let first = items.first().ok_or_else(|| invalid("record is an empty array"))?;
    let key = first
        .as_str()
        .ok_or_else(|| invalid("first element of record is not a string"))?;
    Ok(key.to_string())
}

/// Totals of a finished partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionStats {
    pub records: u64,
    pub shards: usize,
}

/// Feeds lines into a [`ShardWriter`], counting them as it goes.
pub struct Partitioner {
    shards: ShardWriter,
    line_no: u64,
}

impl Partitioner {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            shards: ShardWriter::new(output_dir),
            line_no: 0,
        }
    }

    /// Parse `line`, then append it verbatim to its key's shard.
    pub fn route(&mut self, line: &[u8]) -> Result<(), SplitError> {
        self.line_no += 1;
        let key = record_key(line, self.line_no)?;
        self.shards.append(&key, line)
    }

    /// Flush and close all shards.
    pub fn finish(self) -> Result<PartitionStats, SplitError> {
        let records = self.shards.line_count();
        let shards = self.shards.close()?;
        Ok(PartitionStats { records, shards })
    }

    /// Close all shards after a failure without masking it.
    pub fn abandon(self) {
        self.shards.abandon();
    }
}

/// Partition everything `reader` yields into `output_dir`, reading
/// `chunk_size` bytes at a time. Shards are closed on every path.
pub fn partition_reader<R: Read>(
    output_dir: &Path,
    reader: R,
    chunk_size: usize,
) -> Result<PartitionStats, SplitError> {
    let mut partitioner = Partitioner::new(output_dir);
    for line in ChunkedLines::new(reader, chunk_size) {
        let routed = line
            .map_err(|e| SplitError::io("failed to read report", e))
            .and_then(|line| partitioner.route(&line));
        if let Err(e) = routed {
            partitioner.abandon();
            return Err(e);
        }
    }
    partitioner.finish()
}
