//! Index rebuild from the log
//!
//! When no usable snapshot exists, the index is reconstructed by scanning
//! the log's valid prefix. The payload is not parsed as JSON: the key is
//! pulled out by a lightweight textual match of the `"id":"..."` pattern,
//! and each key is indexed at its frame's anchor offset (the offset of the
//! length prefix) — the same convention appends use, so a record indexed by
//! rebuild reads back identically to one indexed by insert.

use crate::index::OrderIndex;
use crate::log::{LogReader, LogResult};

/// Statistics from one rebuild pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildStats {
    /// Frames in the log's valid prefix
    pub frames_scanned: usize,
    /// Frames whose key made it into the index (duplicates counted once,
    /// last frame wins)
    pub keys_indexed: usize,
    /// Frames with no extractable key, skipped
    pub frames_skipped: usize,
}

/// Rebuild an index from the log's valid prefix.
///
/// Duplicate keys resolve to the latest frame in log order; frames without
/// an extractable key are skipped. A truncated tail frame silently ends the
/// scan (the log reader reports only the valid prefix).
pub fn rebuild_index(reader: &mut LogReader) -> LogResult<(OrderIndex, RebuildStats)> {
    let frames = reader.scan_valid_prefix()?;

    let mut index = OrderIndex::new();
    let mut stats = RebuildStats {
        frames_scanned: frames.len(),
        keys_indexed: 0,
        frames_skipped: 0,
    };

    for (anchor, payload) in frames {
        match extract_key(&payload) {
            Some(key) => {
                index.insert(key, anchor);
            }
            None => stats.frames_skipped += 1,
        }
    }

    stats.keys_indexed = index.len();
    Ok((index, stats))
}

/// Extract the record key from a payload by textual scan.
///
/// Matches the first `"id"` field and returns the quoted string value that
/// follows it, tolerating whitespace around the colon. Escape sequences in
/// the value are left as written; engine-minted keys never contain them.
pub fn extract_key(payload: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(payload).ok()?;
    let bytes = text.as_bytes();

    let mut i = text.find("\"id\"")? + 4;

    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'"') {
        return None;
    }
    i += 1;

    let value_start = i;
    let mut escaped = false;
    while let Some(&b) = bytes.get(i) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(text[value_start..i].to_string());
        }
        i += 1;
    }

    None
}
