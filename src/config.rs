//! Store configuration
//!
//! File names are configuration, not protocol: the log and snapshot live
//! alongside the process under `data_dir` with fixed default names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for a rookdb instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the log and snapshot files (default: ".")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log file name (default: "users.jsonl")
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Snapshot file name (default: "users.idx")
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    /// Number of synthetic records to seed on first boot (default: 0)
    #[serde(default)]
    pub seed_count: usize,

    /// HTTP adapter configuration
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> String {
    "users.jsonl".to_string()
}

fn default_snapshot_file() -> String {
    "users.idx".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: default_log_file(),
            snapshot_file: default_snapshot_file(),
            seed_count: 0,
            http: HttpConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Create a config rooted at the given data directory.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Full path to the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }

    /// Full path to the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }
}

/// HTTP adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 4040)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4040
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl HttpConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.log_file, "users.jsonl");
        assert_eq!(config.snapshot_file, "users.idx");
        assert_eq!(config.seed_count, 0);
    }

    #[test]
    fn test_paths_join_data_dir() {
        let config = StoreConfig::with_data_dir("/tmp/rook");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/rook/users.jsonl"));
        assert_eq!(config.snapshot_path(), PathBuf::from("/tmp/rook/users.idx"));
    }

    #[test]
    fn test_socket_addr() {
        let http = HttpConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        assert_eq!(http.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"seed_count": 5}"#).unwrap();
        assert_eq!(config.seed_count, 5);
        assert_eq!(config.log_file, "users.jsonl");
        assert_eq!(config.http.port, 4040);
    }
}
