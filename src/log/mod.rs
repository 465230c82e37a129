//! Append-only log store
//!
//! Owns the single data file holding every record ever written. Records are
//! framed (`[u32 BE length][payload]`), appended with fsync, and read back
//! by anchor offset. Deletion never touches this file; superseded and
//! deleted frames simply become unreachable from the index.

mod errors;
mod frame;
mod reader;
mod writer;

pub use errors::{LogError, LogErrorCode, LogResult};
pub use frame::{encode_frame, framed_size, LENGTH_PREFIX_SIZE};
pub use reader::LogReader;
pub use writer::LogWriter;
