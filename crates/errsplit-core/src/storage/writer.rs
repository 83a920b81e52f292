//! Open shard handles, one per key, for the duration of a partition.

use super::{create_parent_dirs, shard_path};
use crate::error::SplitError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends raw lines to `<root>/<key>.json`, opening each shard on first use.
///
/// Call [`close`](Self::close) to flush and surface write errors. Dropping the
/// writer closes the files too, but errors are lost.
pub struct ShardWriter {
    root: PathBuf,
    handles: HashMap<String, BufWriter<File>>,
    lines: u64,
}

impl ShardWriter {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            handles: HashMap::new(),
            lines: 0,
        }
    }

    /// Append `line` (terminator included) to the shard for `key`.
    pub fn append(&mut self, key: &str, line: &[u8]) -> Result<(), SplitError> {
        let path = shard_path(&self.root, key);
        if !self.handles.contains_key(key) {
            tracing::debug!("Opening: {}", path.display());
            create_parent_dirs(&path)?;
            let file = File::create(&path).map_err(|e| {
                SplitError::io(format!("failed to create shard {}", path.display()), e)
            })?;
            self.handles.insert(key.to_string(), BufWriter::new(file));
        }
        if let Some(handle) = self.handles.get_mut(key) {
            handle
                .write_all(line)
                .map_err(|e| SplitError::io(format!("failed to write {}", path.display()), e))?;
        }
        self.lines += 1;
        Ok(())
    }

    /// Number of lines appended so far.
    pub fn line_count(&self) -> u64 {
        self.lines
    }

    /// Flush and close every shard; returns how many were written.
    /// All handles are closed even if one fails; the first error wins.
    pub fn close(self) -> Result<usize, SplitError> {
        let count = self.handles.len();
        let mut first_err = None;
        for (key, handle) in self.handles {
            if let Err(e) = handle.into_inner() {
                let path = shard_path(&self.root, &key);
                first_err.get_or_insert_with(|| {
                    SplitError::io(format!("failed to flush {}", path.display()), e.into_error())
                });
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    /// Close everything after a failed run, logging rather than returning
    /// flush errors so the first failure is what the caller sees.
    pub fn abandon(self) {
        let root = self.root.clone();
        if let Err(e) = self.close() {
            tracing::debug!("closing shards under {} after failure: {}", root.display(), e);
        }
    }
}
