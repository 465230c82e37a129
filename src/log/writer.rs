//! Append-only log writer
//!
//! The writer owns the append handle for the log file. Every append is
//! fsynced before the call returns; the anchor offset handed back is only
//! valid once the frame is durable. The file is never written in place.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{LogError, LogResult};
use super::frame;

/// Append-only writer for the framed log file.
///
/// Tracks the end-of-file offset, which is the anchor for the next append.
pub struct LogWriter {
    /// Path to the log file
    log_path: PathBuf,
    /// Underlying file handle, opened in append mode
    file: File,
    /// Current end-of-file offset
    end_offset: u64,
}

impl LogWriter {
    /// Opens or creates the log file at the given path.
    ///
    /// Creates parent directories if needed. An existing log is opened for
    /// append; its current length becomes the next anchor.
    pub fn open(log_path: &Path) -> LogResult<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LogError::append_failed(
                        format!("Failed to create data directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(log_path)
            .map_err(|e| {
                LogError::append_failed(
                    format!("Failed to open log file: {}", log_path.display()),
                    e,
                )
            })?;

        let end_offset = file
            .metadata()
            .map_err(|e| LogError::append_failed("Failed to read log metadata", e))?
            .len();

        Ok(Self {
            log_path: log_path.to_path_buf(),
            file,
            end_offset,
        })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the current end-of-file offset, the anchor for the next
    /// planned append.
    pub fn size(&self) -> u64 {
        self.end_offset
    }

    /// Appends one framed payload and returns its anchor offset.
    ///
    /// The frame is written and fsynced before the anchor is returned; on
    /// any failure the caller must not update the index.
    pub fn append(&mut self, payload: &[u8]) -> LogResult<u64> {
        let framed = frame::encode_frame(payload);
        let anchor = self.end_offset;

        self.file.write_all(&framed).map_err(|e| {
            LogError::append_failed(format!("Failed to append frame at offset {}", anchor), e)
        })?;

        self.file.sync_all().map_err(|e| {
            LogError::append_failed(format!("fsync failed after append at offset {}", anchor), e)
        })?;

        self.end_offset += frame::framed_size(payload);

        Ok(anchor)
    }
}
