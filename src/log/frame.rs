//! Log frame encoding
//!
//! Each record occupies one frame:
//!
//! ```text
//! +------------------+
//! | Length L         | (u32 BE)
//! +------------------+
//! | Payload          | (exactly L bytes, ends with '\n')
//! +------------------+
//! ```
//!
//! The length covers the exact payload bytes written, including the
//! terminating newline. Readers trust the stored length; they never look
//! for delimiters. A frame's anchor offset is the offset of its first
//! length byte.

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Encode a payload into a complete frame.
///
/// The caller is responsible for the payload already ending in a newline;
/// the length is computed over the bytes as given.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Decode a length prefix.
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_SIZE]) -> u32 {
    u32::from_be_bytes(prefix)
}

/// Total on-disk size of the frame holding `payload`.
pub fn framed_size(payload: &[u8]) -> u64 {
    (LENGTH_PREFIX_SIZE + payload.len()) as u64
}
