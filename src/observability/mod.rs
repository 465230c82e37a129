//! Observability
//!
//! Structured single-line JSON logging. Synchronous by design: an event is
//! on disk (or a pipe) before the operation that produced it proceeds.

mod logger;

pub use logger::{Logger, Severity};
