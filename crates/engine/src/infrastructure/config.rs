//! Engine configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_DATA_DIR: &str = "./data/characters";
pub const DEFAULT_LOG_FILTER: &str = "sheetwright_engine=info";

/// Which character store to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// One JSON file per character under `data_dir`
    File,
    /// Lost when the process exits
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown store backend '{}' (expected file or memory)", other),
        }
    }
}

/// Engine configuration loaded from environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Character store backend
    pub store: StoreBackend,
    /// Directory holding character files (file backend only)
    pub data_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            store: lookup("SHEETWRIGHT_STORE")
                .unwrap_or_else(|| "file".to_string())
                .parse()
                .context("SHEETWRIGHT_STORE must be 'file' or 'memory'")?,
            data_dir: lookup("SHEETWRIGHT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_filter: lookup("SHEETWRIGHT_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
