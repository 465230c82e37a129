//! Record store engine
//!
//! Drives startup (seed / rehydrate / rebuild), owns the index and the log
//! append handle, and implements the four user operations — `get`, `page`,
//! `insert`, `delete` — each timed and each holding the ordering
//! discipline: log append, then index update, then snapshot replace.

mod errors;
mod rebuild;
mod seed;
mod store;
mod timing;

pub use errors::{EngineError, EngineResult};
pub use rebuild::{extract_key, rebuild_index, RebuildStats};
pub use seed::synthetic_bodies;
pub use store::{
    BootMode, BootReport, DeleteOutcome, Engine, PageOutcome, RecordOutcome, PAGE_SIZE,
};
pub use timing::Stopwatch;
