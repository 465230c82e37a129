//! HTTP server
//!
//! Binds the record router to the configured address and serves it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::config::HttpConfig;
use crate::engine::Engine;
use crate::observability::Logger;

use super::routes::record_routes;

/// HTTP server wrapping an engine.
pub struct HttpServer {
    config: HttpConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given engine.
    pub fn new(config: HttpConfig, engine: Engine) -> Self {
        let shared = Arc::new(RwLock::new(engine));

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = record_routes(shared).layer(cors);

        Self { config, router }
    }

    /// The socket address string this server will bind.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Consume the server and return the router (for testing).
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        Logger::info("HTTP_LISTENING", &[("addr", &addr.to_string())]);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
