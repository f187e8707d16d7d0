//! Append-only node store
//!
//! Holds the ordered node sequence behind a single lock and mirrors every
//! mutation into the configured [`PersistenceBackend`]. Readers take a brief
//! shared lock to clone an `Arc` snapshot and then work without holding it.
//!
//! Persistence is best effort: load failures start an empty history and
//! write failures are logged while the in-memory sequence stays authoritative.
//! When several processes share one slot the last writer wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::backend::PersistenceBackend;
use crate::node::{Category, KnowledgeNode, Metadata, MAX_HEAT};

/// Number of nodes returned by [`NodeStore::recent_default`]
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Content of the node seeded into an empty store
pub const BOOTSTRAP_CONTENT: &str =
    "Mastering the Flow Engine: how recorded knowledge shapes your workspace";

/// Heat of the seeded node
pub const BOOTSTRAP_HEAT: f64 = 0.95;

/// Immutable view of the node sequence at one point in time
pub type NodeSnapshot = Arc<Vec<KnowledgeNode>>;

/// Construction-time options for [`NodeStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Seed one academy node when the loaded sequence is empty
    pub bootstrap: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { bootstrap: true }
    }
}

/// Node counts derived from the current sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_nodes: usize,
    pub documentation_nodes: usize,
    pub by_category: BTreeMap<Category, usize>,
}

/// Append-only store of knowledge nodes
pub struct NodeStore {
    nodes: RwLock<NodeSnapshot>,
    backend: Box<dyn PersistenceBackend>,
}

impl NodeStore {
    /// Open a store over `backend`, loading any persisted history.
    ///
    /// Never fails: a missing, unreadable or corrupt slot yields an empty
    /// sequence, which is then seeded if `config.bootstrap` is set.
    pub fn open(backend: Box<dyn PersistenceBackend>, config: StoreConfig) -> Self {
        let nodes = load_nodes(backend.as_ref());

        log::info!(
            "NodeStore opened on {} with {} nodes",
            backend.describe(),
            nodes.len()
        );

        let store = Self {
            nodes: RwLock::new(Arc::new(nodes)),
            backend,
        };

        if config.bootstrap && store.is_empty() {
            store.seed();
        }

        store
    }

    /// Open a store over a concrete backend
    pub fn with_backend<B: PersistenceBackend + 'static>(backend: B, config: StoreConfig) -> Self {
        Self::open(Box::new(backend), config)
    }

    /// Append a new node at full heat and persist the sequence
    pub fn record(
        &self,
        content: impl Into<String>,
        category: Category,
        metadata: Option<Metadata>,
    ) -> KnowledgeNode {
        let node = KnowledgeNode::new(content, category, metadata.unwrap_or_default());
        log::debug!("Recording {} node {}", node.category, node.id);
        self.append(node.clone());
        node
    }

    /// Up to `limit` most recently recorded nodes, newest first
    pub fn recent(&self, limit: usize) -> Vec<KnowledgeNode> {
        let snapshot = self.snapshot();
        snapshot.iter().rev().take(limit).cloned().collect()
    }

    /// [`recent`](Self::recent) with [`DEFAULT_RECENT_LIMIT`]
    pub fn recent_default(&self) -> Vec<KnowledgeNode> {
        self.recent(DEFAULT_RECENT_LIMIT)
    }

    /// All nodes whose category is in `categories`, in insertion order
    pub fn by_categories(&self, categories: &[Category]) -> Vec<KnowledgeNode> {
        let snapshot = self.snapshot();
        snapshot
            .iter()
            .filter(|node| categories.contains(&node.category))
            .cloned()
            .collect()
    }

    /// Remove every node and persist the empty sequence
    pub fn clear(&self) {
        let mut nodes = self.nodes.write();
        let removed = nodes.len();
        *nodes = Arc::new(Vec::new());
        self.persist(&nodes);
        log::info!("Cleared {} nodes", removed);
    }

    /// Cheap immutable view of the current sequence
    pub fn snapshot(&self) -> NodeSnapshot {
        Arc::clone(&self.nodes.read())
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Count nodes per category
    pub fn stats(&self) -> StoreStats {
        let snapshot = self.snapshot();
        let mut by_category: BTreeMap<Category, usize> = BTreeMap::new();
        for node in snapshot.iter() {
            *by_category.entry(node.category).or_insert(0) += 1;
        }

        let documentation_nodes = by_category
            .iter()
            .filter(|(category, _)| category.is_documentation())
            .map(|(_, count)| count)
            .sum();

        StoreStats {
            total_nodes: snapshot.len(),
            documentation_nodes,
            by_category,
        }
    }

    /// Where the sequence is persisted
    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    fn seed(&self) {
        let result = KnowledgeNode::builder()
            .category(Category::Academy)
            .content(BOOTSTRAP_CONTENT)
            .heat(BOOTSTRAP_HEAT)
            .build();

        match result {
            Ok(node) => {
                log::info!("Seeding empty store with bootstrap academy node");
                self.append(node);
            }
            Err(e) => log::error!("Failed to build bootstrap node: {}", e),
        }
    }

    fn append(&self, node: KnowledgeNode) {
        let mut nodes = self.nodes.write();
        // Copy-on-write: outstanding snapshots keep the previous sequence.
        Arc::make_mut(&mut nodes).push(node);
        self.persist(&nodes);
    }

    /// Serialize and write the full sequence. Caller holds the write lock.
    fn persist(&self, nodes: &[KnowledgeNode]) {
        let bytes = match serde_json::to_vec(nodes) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to serialize node sequence: {}", e);
                return;
            }
        };

        if let Err(e) = self.backend.save(&bytes) {
            log::error!(
                "Failed to persist {} nodes to {}: {}. Keeping in-memory state.",
                nodes.len(),
                self.backend.describe(),
                e
            );
        }
    }
}

/// Read the persisted slot, treating every failure as empty history
fn load_nodes(backend: &dyn PersistenceBackend) -> Vec<KnowledgeNode> {
    let bytes = match backend.load() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            log::debug!("No persisted history at {}", backend.describe());
            return Vec::new();
        }
        Err(e) => {
            log::warn!(
                "Failed to read persisted history from {}: {}. Starting empty.",
                backend.describe(),
                e
            );
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<KnowledgeNode>>(&bytes) {
        Ok(mut nodes) => {
            for node in nodes.iter_mut() {
                if !(0.0..=MAX_HEAT).contains(&node.heat) {
                    log::warn!(
                        "Node {} at {} has out-of-range heat {}; clamping",
                        node.id,
                        backend.describe(),
                        node.heat
                    );
                    // NaN clamps to NaN, so fall back to cold.
                    node.heat = if node.heat.is_nan() {
                        0.0
                    } else {
                        node.heat.clamp(0.0, MAX_HEAT)
                    };
                }
            }
            nodes
        }
        Err(e) => {
            log::warn!(
                "Persisted history at {} is malformed: {}. Starting empty.",
                backend.describe(),
                e
            );
            Vec::new()
        }
    }
}
