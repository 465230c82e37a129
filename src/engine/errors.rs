//! Engine error surface
//!
//! Unified error type for the four user operations and startup. Subsystem
//! errors (log, snapshot, index) are wrapped rather than flattened so their
//! codes and context survive to the caller.

use std::fmt;

use crate::index::IndexError;
use crate::log::LogError;
use crate::snapshot::SnapshotError;

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type
#[derive(Debug)]
pub enum EngineError {
    /// Lookup or delete against an absent key
    NotFound(String),

    /// Insert input missing required fields or not a JSON object
    MalformedInput(String),

    /// Log store failure (append, read, or frame corruption)
    Log(LogError),

    /// Snapshot failure (I/O or corruption)
    Snapshot(SnapshotError),

    /// Index failure (positional lookup out of range)
    Index(IndexError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "Record not found: {}", key),
            Self::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Self::Log(e) => write!(f, "{}", e),
            Self::Snapshot(e) => write!(f, "{}", e),
            Self::Index(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Log(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Index(e) => Some(e),
            _ => None,
        }
    }
}

impl EngineError {
    /// Create a not-found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a malformed-input error
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ROOK_NOT_FOUND",
            Self::MalformedInput(_) => "ROOK_MALFORMED_INPUT",
            Self::Log(e) => e.code().code(),
            Self::Snapshot(e) => e.code().code(),
            Self::Index(e) => e.code().code(),
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::MalformedInput(_) => 400,
            Self::Log(_) | Self::Snapshot(_) | Self::Index(_) => 500,
        }
    }
}

impl From<LogError> for EngineError {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

impl From<SnapshotError> for EngineError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

impl From<IndexError> for EngineError {
    fn from(e: IndexError) -> Self {
        Self::Index(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedInput(e.to_string())
    }
}
