//! The record store engine
//!
//! Composes the log store, the order-statistic index, and snapshot
//! persistence into the four user operations. Within every mutation the
//! side effects happen in a fixed order: log append, then index update,
//! then snapshot replace. A failed append leaves the index untouched.
//!
//! # Startup
//!
//! | Log file | Snapshot | Action                                         |
//! |----------|----------|------------------------------------------------|
//! | absent   | —        | create empty log, seed if configured, snapshot |
//! | present  | usable   | bulk-load index from snapshot (trusted)        |
//! | present  | absent or unreadable | rebuild index from log, snapshot   |

use serde_json::Value;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::index::OrderIndex;
use crate::log::{LogError, LogReader, LogWriter};
use crate::observability::Logger;
use crate::snapshot::{self, SnapshotEntry};

use super::errors::{EngineError, EngineResult};
use super::rebuild;
use super::seed;
use super::timing::Stopwatch;

/// Fixed page size for positional pagination.
pub const PAGE_SIZE: usize = 20;

/// How the index came to be at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Fresh store: log created, optionally seeded
    Created,
    /// Warm boot: index bulk-loaded from the snapshot
    Rehydrated,
    /// Recovery: index rebuilt by scanning the log
    Rebuilt,
}

impl BootMode {
    fn as_str(&self) -> &'static str {
        match self {
            BootMode::Created => "created",
            BootMode::Rehydrated => "rehydrated",
            BootMode::Rebuilt => "rebuilt",
        }
    }
}

/// Summary of a completed startup.
#[derive(Debug, Clone)]
pub struct BootReport {
    /// How the index was obtained
    pub mode: BootMode,
    /// Live keys after startup
    pub live_records: usize,
    /// End-of-file offset of the log after startup
    pub log_size: u64,
}

/// Result of `get` and `insert`: one record plus the operation cost.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// The record body
    pub record: Value,
    /// Wall-clock cost in milliseconds
    pub elapsed_ms: f64,
}

/// Result of `page`.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Up to [`PAGE_SIZE`] records in ascending key order
    pub records: Vec<Value>,
    /// The page actually served (after coercion to >= 1)
    pub page: u64,
    /// Wall-clock cost in milliseconds
    pub elapsed_ms: f64,
}

/// Result of `delete`.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Wall-clock cost in milliseconds
    pub elapsed_ms: f64,
}

/// The engine. Owns the index and the log's append handle for its whole
/// lifetime; read handles are opened per operation.
pub struct Engine {
    config: StoreConfig,
    log: LogWriter,
    index: OrderIndex,
    boot: BootReport,
}

impl Engine {
    /// Boot an engine: open or create the log, then obtain the index by
    /// seeding, rehydrating, or rebuilding (see the module table).
    pub fn start(config: StoreConfig) -> EngineResult<Self> {
        let log_path = config.log_path();
        let snapshot_path = config.snapshot_path();
        let log_existed = log_path.exists();
        let seed_count = config.seed_count;

        let log = LogWriter::open(&log_path)?;
        let mut engine = Self {
            config,
            log,
            index: OrderIndex::new(),
            boot: BootReport {
                mode: BootMode::Created,
                live_records: 0,
                log_size: 0,
            },
        };

        let mode = if !log_existed {
            engine.seed(&seed::synthetic_bodies(seed_count))?;
            BootMode::Created
        } else if let Some(entries) = load_usable_snapshot(&snapshot_path) {
            engine.index.bulk_load(
                entries
                    .into_iter()
                    .map(|e| (e.key, e.offset))
                    .collect(),
            );
            BootMode::Rehydrated
        } else {
            engine.rebuild_from_log()?;
            engine.persist_snapshot()?;
            BootMode::Rebuilt
        };

        engine.boot = BootReport {
            mode,
            live_records: engine.index.len(),
            log_size: engine.log.size(),
        };

        Logger::info(
            "ENGINE_START",
            &[
                ("mode", mode.as_str()),
                ("records", &engine.boot.live_records.to_string()),
                ("log_bytes", &engine.boot.log_size.to_string()),
            ],
        );

        Ok(engine)
    }

    /// How this engine booted.
    pub fn boot(&self) -> &BootReport {
        &self.boot
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The live order-statistic index.
    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    /// Current end-of-file offset of the log.
    pub fn log_size(&self) -> u64 {
        self.log.size()
    }

    /// Startup-only convenience: append the given record bodies (each must
    /// carry a string `id`), index them, and persist one snapshot.
    pub fn seed(&mut self, bodies: &[Value]) -> EngineResult<usize> {
        for body in bodies {
            let key = body
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    EngineError::malformed_input("seed record missing string \"id\" field")
                })?
                .to_string();

            let anchor = self.log.append(&encode_body(body)?)?;
            self.index.insert(key, anchor);
        }

        self.persist_snapshot()?;

        if !bodies.is_empty() {
            Logger::info("ENGINE_SEEDED", &[("records", &bodies.len().to_string())]);
        }

        Ok(bodies.len())
    }

    /// Point lookup by key.
    pub fn get(&self, key: &str) -> EngineResult<RecordOutcome> {
        let sw = Stopwatch::start();

        let offset = self
            .index
            .lookup(key)
            .ok_or_else(|| EngineError::not_found(key))?;

        let mut reader = LogReader::open(&self.config.log_path())?;
        let payload = reader.read_frame(offset)?;
        let record = parse_payload(offset, &payload)?;

        Ok(RecordOutcome {
            record,
            elapsed_ms: sw.elapsed_ms(),
        })
    }

    /// Positional pagination: up to [`PAGE_SIZE`] records starting at
    /// positional index `(n - 1) * PAGE_SIZE`, ascending by key. A page
    /// number below 1 is coerced to 1; a page past the end is empty.
    pub fn page(&self, n: i64) -> EngineResult<PageOutcome> {
        let sw = Stopwatch::start();

        let page = n.max(1) as u64;
        let start = usize::try_from((page - 1).saturating_mul(PAGE_SIZE as u64))
            .unwrap_or(usize::MAX);
        let entries = self.index.range(start, PAGE_SIZE);

        let mut records = Vec::with_capacity(entries.len());
        if !entries.is_empty() {
            let mut reader = LogReader::open(&self.config.log_path())?;
            for (_, offset) in &entries {
                let payload = reader.read_frame(*offset)?;
                records.push(parse_payload(*offset, &payload)?);
            }
        }

        Ok(PageOutcome {
            records,
            page,
            elapsed_ms: sw.elapsed_ms(),
        })
    }

    /// Insert a new record. The engine mints the key; the caller supplies
    /// the remaining fields (`name` and `email` are required).
    pub fn insert(&mut self, fields: &Value) -> EngineResult<RecordOutcome> {
        let sw = Stopwatch::start();

        let obj = fields
            .as_object()
            .ok_or_else(|| EngineError::malformed_input("insert body must be a JSON object"))?;

        for required in ["name", "email"] {
            match obj.get(required) {
                Some(Value::String(s)) if !s.is_empty() => {}
                _ => {
                    return Err(EngineError::malformed_input(format!(
                        "missing required field: {}",
                        required
                    )))
                }
            }
        }

        let key = Uuid::new_v4().to_string();
        let mut body = serde_json::Map::with_capacity(obj.len() + 1);
        body.insert("id".to_string(), Value::String(key.clone()));
        for (k, v) in obj {
            if k != "id" {
                body.insert(k.clone(), v.clone());
            }
        }
        let record = Value::Object(body);

        // Log append first; if it fails the index must stay untouched.
        let anchor = self.log.append(&encode_body(&record)?)?;

        let newly_added = self.index.insert(key.clone(), anchor);
        if !newly_added {
            Logger::warn("DUPLICATE_KEY", &[("key", &key)]);
        }

        self.persist_snapshot()?;

        Ok(RecordOutcome {
            record,
            elapsed_ms: sw.elapsed_ms(),
        })
    }

    /// Delete by key. Removes the index entry and persists a snapshot; the
    /// log is not modified (the frame merely becomes unreachable).
    pub fn delete(&mut self, key: &str) -> EngineResult<DeleteOutcome> {
        let sw = Stopwatch::start();

        if !self.index.remove(key) {
            return Err(EngineError::not_found(key));
        }

        self.persist_snapshot()?;

        Ok(DeleteOutcome {
            elapsed_ms: sw.elapsed_ms(),
        })
    }

    /// Rebuild the index from the log's valid prefix.
    fn rebuild_from_log(&mut self) -> EngineResult<()> {
        let mut reader = LogReader::open(&self.config.log_path())?;
        let (index, stats) = rebuild::rebuild_index(&mut reader)?;
        self.index = index;

        Logger::info(
            "INDEX_REBUILT",
            &[
                ("frames", &stats.frames_scanned.to_string()),
                ("records", &stats.keys_indexed.to_string()),
                ("skipped", &stats.frames_skipped.to_string()),
            ],
        );

        Ok(())
    }

    /// Replace the snapshot with the index's current in-order enumeration.
    ///
    /// Snapshot corruption at this point has no recovery path (rebuild only
    /// exists at startup), so it is escalated to fatal.
    fn persist_snapshot(&self) -> EngineResult<()> {
        let entries: Vec<SnapshotEntry> = self
            .index
            .in_order()
            .map(|(key, offset)| SnapshotEntry {
                key: key.to_string(),
                offset,
            })
            .collect();

        snapshot::persist(&self.config.snapshot_path(), &entries)
            .map_err(|e| if e.is_corruption() { e.fatal() } else { e })?;
        Ok(())
    }
}

/// Serialize a record body to its on-log payload: compact JSON plus the
/// terminating newline that the frame length counts.
fn encode_body(body: &Value) -> EngineResult<Vec<u8>> {
    let mut payload = serde_json::to_vec(body)?;
    payload.push(b'\n');
    Ok(payload)
}

/// Parse a stored payload back into JSON. At this point the frame was
/// readable, so a parse failure means the stored bytes are bad.
fn parse_payload(offset: u64, payload: &[u8]) -> EngineResult<Value> {
    serde_json::from_slice(payload).map_err(|e| {
        EngineError::Log(LogError::corrupt_frame(
            offset,
            format!("Stored payload is not valid JSON: {}", e),
        ))
    })
}

/// Load the snapshot if it exists and validates; any failure is logged and
/// answered with `None` so startup falls back to a rebuild.
fn load_usable_snapshot(path: &std::path::Path) -> Option<Vec<SnapshotEntry>> {
    if !path.exists() {
        return None;
    }

    match snapshot::load(path) {
        Ok(entries) => Some(entries),
        Err(e) => {
            Logger::warn(
                "SNAPSHOT_REJECTED",
                &[
                    ("path", &path.display().to_string()),
                    ("reason", e.message()),
                ],
            );
            None
        }
    }
}
