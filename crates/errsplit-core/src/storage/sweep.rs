//! Removal of shards left over from the previous run.

use super::SHARD_SUFFIX;
use crate::error::SplitError;
use std::fs;
use std::io;
use std::path::Path;

/// Delete every file named `*.json` under `dir`, recursively.
/// Symlinked directories are not followed. A missing `dir` removes nothing.
/// Returns the number of files removed.
pub fn remove_shards(dir: &Path) -> Result<usize, SplitError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(SplitError::io(
                format!("failed to list {}", dir.display()),
                e,
            ))
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry =
            entry.map_err(|e| SplitError::io(format!("failed to list {}", dir.display()), e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| SplitError::io(format!("failed to stat {}", path.display()), e))?;
        if file_type.is_dir() {
            removed += remove_shards(&path)?;
            continue;
        }
        let is_shard = entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(SHARD_SUFFIX.as_bytes());
        if is_shard {
            fs::remove_file(&path)
                .map_err(|e| SplitError::io(format!("failed to remove {}", path.display()), e))?;
            tracing::debug!("Removed: {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_json_recursively_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nvim")).unwrap();
        fs::write(root.join("stale.json"), b"[\"stale\"]\n").unwrap();
        fs::write(root.join("src/nvim/eval.c.json"), b"x\n").unwrap();
        fs::write(root.join(".errors"), b"\"v1\"").unwrap();
        fs::write(root.join("notes.txt"), b"keep").unwrap();
        fs::write(root.join("src/data.jsonl"), b"keep").unwrap();

        assert_eq!(remove_shards(root).unwrap(), 2);
        assert!(!root.join("stale.json").exists());
        assert!(!root.join("src/nvim/eval.c.json").exists());
        assert!(root.join(".errors").exists());
        assert!(root.join("notes.txt").exists());
        assert!(root.join("src/data.jsonl").exists());
        assert!(root.join("src/nvim").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn removes_json_with_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join(OsStr::from_bytes(b"stale-\xff.json"));
        let other = dir.path().join(OsStr::from_bytes(b"keep-\xfe.txt"));
        fs::write(&stale, b"x\n").unwrap();
        fs::write(&other, b"keep").unwrap();

        assert_eq!(remove_shards(dir.path()).unwrap(), 1);
        assert!(!stale.exists());
        assert!(other.exists());
    }

    #[test]
    fn missing_directory_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove_shards(&dir.path().join("absent")).unwrap(), 0);
    }
}
