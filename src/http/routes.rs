//! Record HTTP routes
//!
//! Adapts the four engine operations into request handlers. The engine sits
//! behind a single reader-writer lock: `get` and `page` take a shared
//! guard, `insert` and `delete` an exclusive one spanning the mutation's
//! full critical section (log append, index update, snapshot replace).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::engine::Engine;

use super::errors::{HttpError, HttpResult};

/// Engine shared across handlers.
pub type SharedEngine = Arc<RwLock<Engine>>;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; defaults to 1
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub record: Value,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub records: Vec<Value>,
    pub page: u64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub elapsed_ms: f64,
}

// ==================
// Handlers
// ==================

async fn get_record(
    State(engine): State<SharedEngine>,
    Path(key): Path<String>,
) -> HttpResult<Json<RecordResponse>> {
    let engine = engine.read().await;
    let outcome = engine.get(&key)?;
    Ok(Json(RecordResponse {
        record: outcome.record,
        elapsed_ms: outcome.elapsed_ms,
    }))
}

async fn list_page(
    State(engine): State<SharedEngine>,
    Query(query): Query<PageQuery>,
) -> HttpResult<Json<PageResponse>> {
    let engine = engine.read().await;
    let outcome = engine.page(query.page.unwrap_or(1))?;
    Ok(Json(PageResponse {
        records: outcome.records,
        page: outcome.page,
        elapsed_ms: outcome.elapsed_ms,
    }))
}

async fn insert_record(
    State(engine): State<SharedEngine>,
    Json(body): Json<Value>,
) -> HttpResult<Json<RecordResponse>> {
    // Axum already rejected unparseable JSON; catch parseable non-objects
    // here so they never reach the engine.
    if !body.is_object() {
        return Err(HttpError::InvalidBody(
            "insert body must be a JSON object".to_string(),
        ));
    }

    let mut engine = engine.write().await;
    let outcome = engine.insert(&body)?;
    Ok(Json(RecordResponse {
        record: outcome.record,
        elapsed_ms: outcome.elapsed_ms,
    }))
}

async fn delete_record(
    State(engine): State<SharedEngine>,
    Path(key): Path<String>,
) -> HttpResult<Json<DeleteResponse>> {
    let mut engine = engine.write().await;
    let outcome = engine.delete(&key)?;
    Ok(Json(DeleteResponse {
        elapsed_ms: outcome.elapsed_ms,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Build the record router over a shared engine.
pub fn record_routes(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", get(list_page).post(insert_record))
        .route("/records/{key}", get(get_record).delete(delete_record))
        .with_state(engine)
}
