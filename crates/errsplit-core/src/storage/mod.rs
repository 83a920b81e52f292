//! Shard files on disk.
//!
//! Naming (`<output_dir>/<key>.json`), directory creation, the stale-shard
//! sweep that runs before a rebuild, and the per-key writer.

mod sweep;
mod writer;

pub use sweep::remove_shards;
pub use writer::ShardWriter;

use crate::error::SplitError;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of every shard file; also what the sweep matches on.
pub const SHARD_SUFFIX: &str = ".json";

/// Path of the shard for `key`: appends `.json` to `output_dir/key`
/// (e.g. `src/nvim/eval.c` → `<output_dir>/src/nvim/eval.c.json`).
///
/// Keys are not sanitized; separators in a key create subdirectories.
pub fn shard_path(output_dir: &Path, key: &str) -> PathBuf {
    let mut o = output_dir.join(key).into_os_string();
    o.push(SHARD_SUFFIX);
    PathBuf::from(o)
}

/// Create the parent directories of `path` (mode 0755 on Unix). Idempotent.
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), SplitError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if parent.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(parent)
        .map_err(|e| SplitError::io(format!("failed to create directory {}", parent.display()), e))
}
