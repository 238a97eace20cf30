//! Moving artifacts out of the scratch directory, and their digests.

use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{io_err, BuildError};

/// Move `from` to `to`, replacing anything already at `to`.
///
/// Tries a rename first and falls back to copy-then-delete, since the scratch
/// directory may live on another filesystem.
pub fn relocate(from: &Path, to: &Path) -> Result<(), BuildError> {
    remove_existing(to)?;
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    tracing::debug!(from = %from.display(), to = %to.display(), "rename failed, copying");
    copy_recursive(from, to)?;
    if from.is_dir() {
        std::fs::remove_dir_all(from).map_err(|e| io_err(from, e))
    } else {
        std::fs::remove_file(from).map_err(|e| io_err(from, e))
    }
}

fn remove_existing(path: &Path) -> Result<(), BuildError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path).map_err(|e| io_err(path, e)),
        Ok(_) => std::fs::remove_file(path).map_err(|e| io_err(path, e)),
        Err(_) => Ok(()),
    }
}

fn copy_recursive(from: &Path, to: &Path) -> Result<(), BuildError> {
    if !from.is_dir() {
        std::fs::copy(from, to).map_err(|e| io_err(from, e))?;
        return Ok(());
    }
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            io_err(path, e.into())
        })?;
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| io_err(&dest, e))?;
        } else {
            std::fs::copy(entry.path(), &dest).map_err(|e| io_err(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Hex SHA-256 of a file, or `None` for directories.
pub fn digest(path: &Path) -> Result<Option<String>, BuildError> {
    if path.is_dir() {
        return Ok(None);
    }
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(Some(hex::encode(hasher.finalize())))
}
