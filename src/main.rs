//! rookdb entry point
//!
//! Parse arguments, boot the engine, serve the HTTP adapter. Subsystems
//! are never reached directly from here.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use rookdb::config::{HttpConfig, StoreConfig};
use rookdb::engine::Engine;
use rookdb::http::HttpServer;
use rookdb::observability::Logger;

#[derive(Debug, Parser)]
#[command(name = "rookdb", about = "An embedded record store served over HTTP")]
struct Args {
    /// Directory holding the log and snapshot files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Port for the HTTP adapter
    #[arg(long, default_value_t = 4040)]
    port: u16,

    /// Seed this many synthetic records on first boot
    #[arg(long, default_value_t = 0)]
    seed: usize,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = StoreConfig::with_data_dir(&args.data_dir);
    config.seed_count = args.seed;
    config.http = HttpConfig {
        port: args.port,
        ..HttpConfig::default()
    };

    let http_config = config.http.clone();

    let engine = match Engine::start(config) {
        Ok(engine) => engine,
        Err(e) => {
            Logger::fatal(
                "ENGINE_START_FAILED",
                &[("code", e.code()), ("message", &e.to_string())],
            );
            process::exit(1);
        }
    };

    let server = HttpServer::new(http_config, engine);
    if let Err(e) = server.start().await {
        Logger::fatal("HTTP_SERVER_FAILED", &[("message", &e.to_string())]);
        process::exit(1);
    }
}
