//! Startup and recovery tests
//!
//! The startup protocol in all its branches: fresh create, warm rehydrate,
//! cold rebuild, corrupt-snapshot fallback, and truncated-tail logs.

use std::fs;
use std::io::Write;

use rookdb::config::StoreConfig;
use rookdb::engine::{BootMode, Engine};
use rookdb::snapshot;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn config_for(dir: &TempDir) -> StoreConfig {
    StoreConfig::with_data_dir(dir.path())
}

fn seeded(dir: &TempDir, keys: &[&str]) -> Engine {
    let mut engine = Engine::start(config_for(dir)).unwrap();
    let bodies: Vec<_> = keys.iter().map(|k| json!({"id": k})).collect();
    engine.seed(&bodies).unwrap();
    engine
}

// =============================================================================
// Startup branches
// =============================================================================

#[test]
fn test_fresh_boot_creates_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::start(config_for(&temp_dir)).unwrap();

    assert_eq!(engine.boot().mode, BootMode::Created);
    assert_eq!(engine.boot().live_records, 0);
    assert_eq!(engine.page(1).unwrap().records.len(), 0);
    assert!(snapshot::load(&engine.config().snapshot_path())
        .unwrap()
        .is_empty());
}

#[test]
fn test_warm_boot_trusts_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    {
        seeded(&temp_dir, &["A", "B", "C"]);
    }

    let engine = Engine::start(config_for(&temp_dir)).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rehydrated);
    assert_eq!(engine.boot().live_records, 3);
    assert_eq!(engine.get("C").unwrap().record, json!({"id": "C"}));
}

#[test]
fn test_cold_boot_rebuilds_from_log() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_before;
    {
        let engine = seeded(&temp_dir, &["A", "B", "C"]);
        snapshot_before = snapshot::load(&engine.config().snapshot_path()).unwrap();
    }

    let config = config_for(&temp_dir);
    fs::remove_file(config.snapshot_path()).unwrap();

    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rebuilt);

    // The rebuild reconstructs the identical index and re-persists it.
    let snapshot_after = snapshot::load(&engine.config().snapshot_path()).unwrap();
    assert_eq!(snapshot_before, snapshot_after);
}

#[test]
fn test_corrupt_snapshot_falls_back_to_rebuild() {
    let temp_dir = TempDir::new().unwrap();
    {
        seeded(&temp_dir, &["A", "B"]);
    }

    let config = config_for(&temp_dir);
    fs::write(config.snapshot_path(), b"not json at all").unwrap();

    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rebuilt);
    assert_eq!(engine.boot().live_records, 2);
    assert!(engine.get("A").is_ok());
}

#[test]
fn test_unsorted_snapshot_falls_back_to_rebuild() {
    let temp_dir = TempDir::new().unwrap();
    {
        seeded(&temp_dir, &["A", "B"]);
    }

    let config = config_for(&temp_dir);
    fs::write(
        config.snapshot_path(),
        br#"[{"key":"B","offset":0},{"key":"A","offset":15}]"#,
    )
    .unwrap();

    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rebuilt);
    assert_eq!(engine.get("A").unwrap().record, json!({"id": "A"}));
}

// =============================================================================
// Truncated logs
// =============================================================================

#[test]
fn test_rebuild_indexes_only_the_valid_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    {
        seeded(&temp_dir, &["A", "B", "C"]);
    }

    // Simulate a crash mid-append: a length prefix promising more bytes
    // than the file holds.
    {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(config.log_path())
            .unwrap();
        file.write_all(&64u32.to_be_bytes()).unwrap();
        file.write_all(b"{\"id\":\"D\"").unwrap();
    }
    fs::remove_file(config.snapshot_path()).unwrap();

    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rebuilt);
    assert_eq!(engine.boot().live_records, 3);
    assert!(engine.get("D").is_err());
    assert_eq!(engine.get("C").unwrap().record, json!({"id": "C"}));
}

#[test]
fn test_rebuild_of_empty_log() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    fs::write(config.log_path(), b"").unwrap();

    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.boot().mode, BootMode::Rebuilt);
    assert_eq!(engine.boot().live_records, 0);
}

// =============================================================================
// Superseded records across restart
// =============================================================================

#[test]
fn test_rebuild_resolves_duplicates_to_latest_frame() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    {
        let mut engine = Engine::start(config.clone()).unwrap();
        engine.seed(&[json!({"id": "K", "v": 1})]).unwrap();
        engine.seed(&[json!({"id": "K", "v": 2})]).unwrap();
    }

    fs::remove_file(config.snapshot_path()).unwrap();
    let engine = Engine::start(config).unwrap();

    assert_eq!(engine.boot().live_records, 1);
    assert_eq!(engine.get("K").unwrap().record["v"], 2);
}

#[test]
fn test_writes_continue_after_each_boot_mode() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    // Created
    {
        let mut engine = Engine::start(config.clone()).unwrap();
        engine
            .insert(&json!({"name": "a", "email": "a@x"}))
            .unwrap();
    }
    // Rehydrated
    {
        let mut engine = Engine::start(config.clone()).unwrap();
        assert_eq!(engine.boot().mode, BootMode::Rehydrated);
        engine
            .insert(&json!({"name": "b", "email": "b@x"}))
            .unwrap();
    }
    // Rebuilt
    fs::remove_file(config.snapshot_path()).unwrap();
    {
        let mut engine = Engine::start(config.clone()).unwrap();
        assert_eq!(engine.boot().mode, BootMode::Rebuilt);
        engine
            .insert(&json!({"name": "c", "email": "c@x"}))
            .unwrap();
        assert_eq!(engine.boot().live_records + 1, engine.index().len());
    }

    // All three records survive a final warm boot.
    let engine = Engine::start(config).unwrap();
    assert_eq!(engine.page(1).unwrap().records.len(), 3);
}
