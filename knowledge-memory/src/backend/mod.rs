//! Persistence backends
//!
//! The index persists its whole node sequence into a single key-value slot.
//! A backend only moves opaque bytes in and out of that slot; encoding is the
//! store's concern.

mod file;
mod memory;
mod rocks;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KnowledgeError, Result};

pub use file::FileBackend;
pub use memory::{MemoryBackend, NoopBackend};
pub use rocks::RocksDbBackend;

/// Fixed process-wide key of the persisted slot
pub const SLOT_KEY: &str = "knowledge_memory_index";

/// Durable (or session-durable) home for the serialized node sequence
pub trait PersistenceBackend: Send + Sync {
    /// Read the slot. `Ok(None)` means nothing has been written yet.
    fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the slot contents
    fn save(&self, bytes: &[u8]) -> Result<()>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Backend selection for configuration layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Nothing is persisted
    None,
    /// Process memory only
    Memory,
    /// JSON file inside a data directory
    #[default]
    File,
    /// RocksDB database inside a data directory
    Rocksdb,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Memory => "memory",
            Self::File => "file",
            Self::Rocksdb => "rocksdb",
        }
    }

    /// Whether this backend needs a data directory
    pub fn uses_data_dir(&self) -> bool {
        matches!(self, Self::File | Self::Rocksdb)
    }

    /// Construct the backend rooted at `data_dir`
    pub fn open(&self, data_dir: &Path) -> Result<Box<dyn PersistenceBackend>> {
        Ok(match self {
            Self::None => Box::new(NoopBackend),
            Self::Memory => Box::new(MemoryBackend::new()),
            Self::File => Box::new(FileBackend::new(data_dir)?),
            Self::Rocksdb => Box::new(RocksDbBackend::open(data_dir)?),
        })
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = KnowledgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "noop" => Ok(Self::None),
            "memory" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            "rocksdb" | "rocks" => Ok(Self::Rocksdb),
            _ => Err(KnowledgeError::invalid_backend(s)),
        }
    }
}
