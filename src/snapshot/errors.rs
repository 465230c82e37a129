//! Snapshot error types
//!
//! Error codes:
//! - ROOK_SNAPSHOT_IO (ERROR severity)
//! - ROOK_SNAPSHOT_CORRUPTION (ERROR severity at startup, where rebuild is
//!   the recovery path; FATAL when detected at runtime)

use std::fmt;
use std::io;

/// Severity levels for snapshot errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// Process must terminate
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Snapshot-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    /// I/O failure reading or writing the snapshot file
    RookSnapshotIo,
    /// Snapshot unparseable or ordering violated
    RookSnapshotCorruption,
}

impl SnapshotErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotErrorCode::RookSnapshotIo => "ROOK_SNAPSHOT_IO",
            SnapshotErrorCode::RookSnapshotCorruption => "ROOK_SNAPSHOT_CORRUPTION",
        }
    }
}

impl fmt::Display for SnapshotErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Snapshot error type with full context
#[derive(Debug)]
pub struct SnapshotError {
    /// Error code
    code: SnapshotErrorCode,
    /// Severity in the context the error arose
    severity: Severity,
    /// Human-readable message
    message: String,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl SnapshotError {
    /// Create a snapshot I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: SnapshotErrorCode::RookSnapshotIo,
            severity: Severity::Error,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a snapshot corruption error (startup context: recoverable via
    /// rebuild)
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::RookSnapshotCorruption,
            severity: Severity::Error,
            message: message.into(),
            source: None,
        }
    }

    /// Mark this error as arising at runtime, where no recovery path exists.
    pub fn fatal(mut self) -> Self {
        self.severity = Severity::Fatal;
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SnapshotErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether the snapshot content itself was bad, as opposed to a
    /// plain I/O failure. Startup falls back to rebuild on either.
    pub fn is_corruption(&self) -> bool {
        self.code == SnapshotErrorCode::RookSnapshotCorruption
    }

    /// Returns whether this error requires process termination.
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity,
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
