//! HTTP adapter errors
//!
//! Thin translation layer: engine errors keep their codes and pick up the
//! HTTP status they already know about; adapter-level problems get their
//! own variants.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;

/// Result type for HTTP handlers
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP adapter errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Engine operation failed
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Request body rejected before reaching the engine
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl HttpError {
    /// Error code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            HttpError::Engine(e) => e.code(),
            HttpError::InvalidBody(_) => "ROOK_INVALID_BODY",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Engine(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    code: &'static str,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            code: self.code(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
