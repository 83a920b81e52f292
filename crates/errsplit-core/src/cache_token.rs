//! The `.errors` sidecar holding the last-seen `ETag`.

use crate::error::SplitError;
use crate::storage::create_parent_dirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar file name inside the output directory.
pub const SIDECAR_NAME: &str = ".errors";

pub fn sidecar_path(output_dir: &Path) -> PathBuf {
    output_dir.join(SIDECAR_NAME)
}

/// First line of the sidecar. Missing or unreadable files count as unset.
pub fn read(output_dir: &Path) -> Option<String> {
    let path = sidecar_path(output_dir);
    match fs::read_to_string(&path) {
        Ok(data) => Some(data.lines().next().unwrap_or("").to_string()),
        Err(e) => {
            tracing::debug!("no cached token at {}: {}", path.display(), e);
            None
        }
    }
}

/// Replace the sidecar contents with `token` (no trailing newline).
pub fn write(output_dir: &Path, token: &str) -> Result<(), SplitError> {
    let path = sidecar_path(output_dir);
    create_parent_dirs(&path)?;
    fs::write(&path, token.as_bytes())
        .map_err(|e| SplitError::io(format!("failed to write token {}", path.display()), e))
}

/// True when the remote validator equals the cached one. A remote without an
/// `ETag` reports `""`, which matches a sidecar holding `""`; a missing
/// sidecar never matches.
pub fn is_unchanged(cached: Option<&str>, remote: &str) -> bool {
    cached == Some(remote)
}
