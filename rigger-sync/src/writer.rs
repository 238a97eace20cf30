//! Whole-file atomic replacement.
//!
//! 1. Create parent directories.
//! 2. Write to `<path>.rigger.tmp`.
//! 3. Rename over the final path (atomic on POSIX).
//!
//! A failed rename removes the temp file and leaves the original untouched.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ConvergeError};

/// Sibling temp path used while writing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.rigger.tmp", path.display()))
}

/// Atomically replace the contents of `path`.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), ConvergeError> {
    atomic_write_with_tmp(path, content, &tmp_path(path))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), ConvergeError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
