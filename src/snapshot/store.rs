//! Snapshot persistence
//!
//! The snapshot is a single JSON document: an array of `{key, offset}`
//! objects sorted ascending by key — the index's in-order enumeration as of
//! the last completed mutation. It is replaced whole after every mutation:
//! written to a temp file, fsynced, renamed over the previous snapshot,
//! then the containing directory is fsynced. A partial snapshot therefore
//! never exists under the real name.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{SnapshotError, SnapshotResult};

/// One persisted index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Record key
    pub key: String,
    /// Anchor offset of the key's authoritative frame in the log
    pub offset: u64,
}

/// Path of the temp file used for atomic replacement.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// fsync a directory so a rename within it is durable.
fn fsync_dir(path: &Path) -> SnapshotResult<()> {
    let dir = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| SnapshotError::io_error(format!("Failed to open directory: {}", path.display()), e))?;

    dir.sync_all().map_err(|e| {
        SnapshotError::io_error(format!("fsync directory failed: {}", path.display()), e)
    })
}

/// Write the snapshot atomically.
///
/// Entries must already be in ascending key order (the index's in-order
/// enumeration). On failure the temp file is removed; the previous snapshot,
/// if any, is left intact.
pub fn persist(path: &Path, entries: &[SnapshotEntry]) -> SnapshotResult<()> {
    let tmp = temp_path(path);

    let result = write_temp_then_rename(path, &tmp, entries);
    if result.is_err() {
        // Never leave a partial temp file behind.
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_temp_then_rename(
    path: &Path,
    tmp: &Path,
    entries: &[SnapshotEntry],
) -> SnapshotResult<()> {
    let body = serde_json::to_vec(entries)
        .map_err(|e| SnapshotError::corruption(format!("Failed to serialize snapshot: {}", e)))?;

    let mut file = File::create(tmp).map_err(|e| {
        SnapshotError::io_error(format!("Failed to create temp snapshot: {}", tmp.display()), e)
    })?;

    file.write_all(&body).map_err(|e| {
        SnapshotError::io_error(format!("Failed to write temp snapshot: {}", tmp.display()), e)
    })?;

    file.sync_all().map_err(|e| {
        SnapshotError::io_error(format!("fsync failed for temp snapshot: {}", tmp.display()), e)
    })?;

    fs::rename(tmp, path).map_err(|e| {
        SnapshotError::io_error(
            format!("Failed to rename snapshot into place: {}", path.display()),
            e,
        )
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fsync_dir(parent)?;
        }
    }

    Ok(())
}

/// Load and validate a snapshot.
///
/// Validation is structural only: the document must parse as an entry array
/// in strictly ascending key order (which also rules out duplicates). The
/// offsets are trusted; a snapshot that fails validation is reported as
/// corruption so startup can fall back to a log rebuild.
pub fn load(path: &Path) -> SnapshotResult<Vec<SnapshotEntry>> {
    let body = fs::read(path).map_err(|e| {
        SnapshotError::io_error(format!("Failed to read snapshot: {}", path.display()), e)
    })?;

    let entries: Vec<SnapshotEntry> = serde_json::from_slice(&body)
        .map_err(|e| SnapshotError::corruption(format!("Snapshot unparseable: {}", e)))?;

    for pair in entries.windows(2) {
        if pair[0].key >= pair[1].key {
            return Err(SnapshotError::corruption(format!(
                "Snapshot ordering violated: {:?} precedes {:?}",
                pair[0].key, pair[1].key
            )));
        }
    }

    Ok(entries)
}
