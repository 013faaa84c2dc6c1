use blockpad_storage::{PageStore, BLOCKS_FILE, PAGES_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "blockpad.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Blockpad server configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the JSON collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Pages collection file name, relative to `data_dir`
    #[serde(default = "default_pages_file")]
    pub pages_file: String,

    /// Legacy blocks collection file name, relative to `data_dir`
    #[serde(default = "default_blocks_file")]
    pub blocks_file: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pages_file() -> String {
    PAGES_FILE.to_string()
}

fn default_blocks_file() -> String {
    BLOCKS_FILE.to_string()
}

impl ServerConfig {
    /// Load config from a file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pages_path(&self) -> PathBuf {
        self.data_dir.join(&self.pages_file)
    }

    pub fn blocks_path(&self) -> PathBuf {
        self.data_dir.join(&self.blocks_file)
    }

    pub fn open_store(&self) -> PageStore {
        PageStore::open_files(&self.pages_path(), &self.blocks_path())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            pages_file: default_pages_file(),
            blocks_file: default_blocks_file(),
        }
    }
}
