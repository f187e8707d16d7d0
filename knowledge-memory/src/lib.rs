//! Knowledge Memory Index
//!
//! Append-only store of short knowledge fragments with heat-ranked substring
//! search and flow metrics derived from the shape of the corpus.
//!
//! ## Features
//!
//! - **Append-only node log** - nodes are immutable; history is cleared only as a whole
//! - **Pluggable persistence** - JSON file, RocksDB, in-memory or no-op slot
//! - **Heat-ranked search** - case-insensitive substring match, stable ordering
//! - **Read-time decay** - optional half-life that never rewrites stored heat
//! - **Flow metrics** - deterministic aggregates from documentation coverage
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use knowledge_memory::{Category, FileBackend, KnowledgeSearch, NodeStore, StoreConfig};
//!
//! let backend = FileBackend::new(".knowledge")?;
//! let store = Arc::new(NodeStore::with_backend(backend, StoreConfig::default()));
//!
//! store.record("Brand Guidelines 2024.pdf", Category::Document, None);
//!
//! let search = KnowledgeSearch::new(store.clone());
//! let hits = search.search("brand");
//! let metrics = search.flow_metrics();
//! # Ok::<(), knowledge_memory::KnowledgeError>(())
//! ```

pub mod backend;
pub mod error;
pub mod metrics;
pub mod node;
pub mod search;
pub mod storage;
pub mod temporal;

// Re-exports for convenience
pub use backend::{
    BackendKind, FileBackend, MemoryBackend, NoopBackend, PersistenceBackend, RocksDbBackend,
    SLOT_KEY,
};
pub use error::{KnowledgeError, Result};
pub use metrics::FlowMetrics;
pub use node::{Category, KnowledgeNode, KnowledgeNodeBuilder, Metadata, NodeId};
pub use search::{KnowledgeSearch, SearchConfig, SearchResult};
pub use storage::{NodeSnapshot, NodeStore, StoreConfig, StoreStats, DEFAULT_RECENT_LIMIT};
pub use temporal::HeatDecay;
