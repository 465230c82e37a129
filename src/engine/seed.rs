//! Synthetic seed records
//!
//! First-boot convenience: when a fresh store is configured with a seed
//! count, the engine appends this many synthetic records before serving.

use serde_json::{json, Value};
use uuid::Uuid;

/// Build `count` synthetic record bodies with minted unique keys.
pub fn synthetic_bodies(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": Uuid::new_v4().to_string(),
                "name": format!("user-{}", i),
                "email": format!("user-{}@example.com", i),
            })
        })
        .collect()
}
