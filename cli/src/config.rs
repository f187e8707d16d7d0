//! Host configuration.
//!
//! Resolved once at startup from command-line flags and environment
//! variables, then handed to [`KnowledgeManager::initialize`](crate::memory::KnowledgeManager::initialize).

use std::path::PathBuf;

use knowledge_memory::{BackendKind, HeatDecay, NodeStore, Result, StoreConfig};

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".knowledge";

/// Everything needed to construct the node store
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Persistence backend
    pub backend: BackendKind,
    /// Directory for file and RocksDB backends
    pub data_dir: PathBuf,
    /// Seed an empty store with the bootstrap node
    pub bootstrap: bool,
    /// Read-time heat half-life in hours (`None` disables decay)
    pub half_life_hours: Option<f64>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bootstrap: true,
            half_life_hours: None,
        }
    }
}

impl IndexConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            bootstrap: self.bootstrap,
        }
    }

    pub fn decay(&self) -> HeatDecay {
        self.half_life_hours
            .map(HeatDecay::from_hours)
            .unwrap_or_default()
    }

    /// Open the configured backend and construct the store
    pub fn open_store(&self) -> Result<NodeStore> {
        let backend = self.backend.open(&self.data_dir)?;
        Ok(NodeStore::open(backend, self.store_config()))
    }
}
