//! Process configuration, TOML-deserializable with sensible defaults.

use serde::{Deserialize, Serialize};

/// Storage subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Number of read-only connections in the pool. 0 = default (2).
    pub read_pool_size: Option<usize>,
    /// Database file path. `None` selects in-memory mode.
    pub db_path: Option<String>,
}

impl StorageConfig {
    /// Effective reader count, defaulting to 2.
    pub fn effective_read_pool_size(&self) -> usize {
        match self.read_pool_size {
            Some(0) | None => 2,
            Some(n) => n,
        }
    }
}

/// Ingestion subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// Default page size for job status listings. Default: 50.
    pub status_page_size: Option<u32>,
}

impl IngestConfig {
    pub fn effective_status_page_size(&self) -> u32 {
        self.status_page_size.unwrap_or(50)
    }
}

/// Top-level Chronicle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChronicleConfig {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

impl ChronicleConfig {
    /// Parse a TOML document. Missing keys take defaults; unknown keys are
    /// ignored.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
