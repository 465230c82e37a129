//! Log reader: random frame reads and the tolerant rebuild scan
//!
//! Readers trust the stored length prefix. A frame is unreadable when its
//! offset is out of range, its length decodes to zero, or the file ends
//! before the payload does. During a normal get/page such a frame fails the
//! operation; during rebuild the scanner stops at the first unreadable
//! frame and reports the valid prefix.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::errors::{LogError, LogResult};
use super::frame::{decode_length, framed_size, LENGTH_PREFIX_SIZE};

/// Reader for the framed log file.
///
/// Opened per operation and dropped at the end of it; the writer keeps the
/// only long-lived handle.
pub struct LogReader {
    /// Path to the log file
    log_path: PathBuf,
    /// Buffered reader
    reader: BufReader<File>,
    /// Total file size at open time
    file_size: u64,
}

impl LogReader {
    /// Opens the log file for reading.
    pub fn open(log_path: &Path) -> LogResult<Self> {
        let file = File::open(log_path).map_err(|e| {
            LogError::read_failed(
                format!("Failed to open log file: {}", log_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| LogError::read_failed("Failed to read log metadata", e))?
            .len();

        Ok(Self {
            log_path: log_path.to_path_buf(),
            reader: BufReader::new(file),
            file_size,
        })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the file size observed at open time.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Reads the frame anchored at `anchor`.
    ///
    /// Returns the payload bytes, newline included.
    pub fn read_frame(&mut self, anchor: u64) -> LogResult<Vec<u8>> {
        self.reader.seek(SeekFrom::Start(anchor)).map_err(|e| {
            LogError::read_failed(format!("Failed to seek to offset {}", anchor), e)
        })?;
        self.read_frame_at_cursor(anchor)
    }

    /// Reads one frame assuming the cursor sits on its length prefix.
    fn read_frame_at_cursor(&mut self, anchor: u64) -> LogResult<Vec<u8>> {
        if anchor + LENGTH_PREFIX_SIZE as u64 > self.file_size {
            return Err(LogError::corrupt_frame(
                anchor,
                format!(
                    "Anchor out of range: offset {} leaves no room for a length prefix in {} bytes",
                    anchor, self.file_size
                ),
            ));
        }

        let mut len_buf = [0u8; LENGTH_PREFIX_SIZE];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            LogError::corrupt_frame(anchor, format!("Failed to read length prefix: {}", e))
        })?;
        let length = decode_length(len_buf) as u64;

        if length == 0 {
            return Err(LogError::corrupt_frame(
                anchor,
                "Length prefix decodes to zero",
            ));
        }

        let payload_end = anchor + LENGTH_PREFIX_SIZE as u64 + length;
        if payload_end > self.file_size {
            return Err(LogError::corrupt_frame(
                anchor,
                format!(
                    "Truncated frame: payload ends at {} but file is {} bytes",
                    payload_end, self.file_size
                ),
            ));
        }

        let mut payload = vec![0u8; length as usize];
        self.reader.read_exact(&mut payload).map_err(|e| {
            LogError::corrupt_frame(anchor, format!("Failed to read frame payload: {}", e))
        })?;

        Ok(payload)
    }

    /// Scans the log from offset 0, returning `(anchor, payload)` for every
    /// readable frame.
    ///
    /// Stops at the first unreadable frame and returns the valid prefix;
    /// plain I/O failures still propagate.
    pub fn scan_valid_prefix(&mut self) -> LogResult<Vec<(u64, Vec<u8>)>> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| LogError::read_failed("Failed to seek to start of log", e))?;

        let mut frames = Vec::new();
        let mut anchor = 0u64;

        while anchor < self.file_size {
            match self.read_frame_at_cursor(anchor) {
                Ok(payload) => {
                    let next = anchor + framed_size(&payload);
                    frames.push((anchor, payload));
                    anchor = next;
                }
                Err(e) if e.is_corruption() => break,
                Err(e) => return Err(e),
            }
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::super::writer::LogWriter;
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_frames(path: &Path, payloads: &[&[u8]]) -> Vec<u64> {
        let mut writer = LogWriter::open(path).unwrap();
        payloads.iter().map(|p| writer.append(p).unwrap()).collect()
    }

    #[test]
    fn test_read_frame_at_each_anchor() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        let anchors = write_frames(&path, &[b"{\"id\":\"A\"}\n", b"{\"id\":\"B\"}\n"]);

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_frame(anchors[0]).unwrap(), b"{\"id\":\"A\"}\n");
        assert_eq!(reader.read_frame(anchors[1]).unwrap(), b"{\"id\":\"B\"}\n");
    }

    #[test]
    fn test_out_of_range_anchor_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        write_frames(&path, &[b"{\"id\":\"A\"}\n"]);

        let mut reader = LogReader::open(&path).unwrap();
        let err = reader.read_frame(10_000).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_zero_length_prefix_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        std::fs::write(&path, [0u8, 0, 0, 0, b'x']).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        let err = reader.read_frame(0).unwrap_err();
        assert!(err.is_corruption());
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn test_truncated_payload_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        // Length prefix claims 100 bytes, only 3 present.
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&100u32.to_be_bytes()).unwrap();
        file.write_all(b"abc").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        let err = reader.read_frame(0).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_scan_returns_all_frames_with_anchors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        let anchors = write_frames(
            &path,
            &[b"{\"id\":\"A\"}\n", b"{\"id\":\"B\"}\n", b"{\"id\":\"C\"}\n"],
        );

        let mut reader = LogReader::open(&path).unwrap();
        let frames = reader.scan_valid_prefix().unwrap();

        assert_eq!(frames.len(), 3);
        for (i, (anchor, payload)) in frames.iter().enumerate() {
            assert_eq!(*anchor, anchors[i]);
            assert!(payload.ends_with(b"\n"));
        }
    }

    #[test]
    fn test_scan_stops_at_truncated_tail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        write_frames(&path, &[b"{\"id\":\"A\"}\n", b"{\"id\":\"B\"}\n"]);

        // Append a partial frame: full length prefix, half a payload.
        {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&path)
                .unwrap();
            file.write_all(&50u32.to_be_bytes()).unwrap();
            file.write_all(b"partial").unwrap();
        }

        let mut reader = LogReader::open(&path).unwrap();
        let frames = reader.scan_valid_prefix().unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].1, b"{\"id\":\"A\"}\n");
        assert_eq!(frames[1].1, b"{\"id\":\"B\"}\n");
    }

    #[test]
    fn test_scan_empty_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.jsonl");
        std::fs::write(&path, b"").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.scan_valid_prefix().unwrap().is_empty());
    }
}
