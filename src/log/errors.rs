//! Log store error types
//!
//! Error codes:
//! - ROOK_LOG_APPEND_FAILED (ERROR severity)
//! - ROOK_LOG_READ_FAILED (ERROR severity)
//! - ROOK_FRAME_CORRUPTION (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for log store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Log-store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// Append or fsync failed
    RookLogAppendFailed,
    /// Read or seek failed
    RookLogReadFailed,
    /// Frame unreadable: zero length, out-of-range offset, or premature EOF
    RookFrameCorruption,
}

impl LogErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::RookLogAppendFailed => "ROOK_LOG_APPEND_FAILED",
            LogErrorCode::RookLogReadFailed => "ROOK_LOG_READ_FAILED",
            LogErrorCode::RookFrameCorruption => "ROOK_FRAME_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Log store error type with full context
#[derive(Debug)]
pub struct LogError {
    /// Error code
    code: LogErrorCode,
    /// Human-readable message
    message: String,
    /// Byte offset if applicable
    offset: Option<u64>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl LogError {
    /// Create an append failure error
    pub fn append_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::RookLogAppendFailed,
            message: message.into(),
            offset: None,
            source: Some(source),
        }
    }

    /// Create a read failure error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::RookLogReadFailed,
            message: message.into(),
            offset: None,
            source: Some(source),
        }
    }

    /// Create a frame corruption error at a byte offset
    pub fn corrupt_frame(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::RookFrameCorruption,
            message: reason.into(),
            offset: Some(offset),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the byte offset if applicable
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns whether the frame itself was unreadable, as opposed to a
    /// plain I/O failure. The rebuild scanner stops on corruption but
    /// propagates I/O failures.
    pub fn is_corruption(&self) -> bool {
        self.code == LogErrorCode::RookFrameCorruption
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(offset) = self.offset {
            write!(f, " (byte_offset: {})", offset)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for log store operations
pub type LogResult<T> = Result<T, LogError>;
