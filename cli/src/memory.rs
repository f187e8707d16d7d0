//! Knowledge store integration for the host process
//!
//! Owns the single [`NodeStore`] instance for the process and hands out
//! async access to store and ranking operations.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::IndexConfig;
use crate::error::{CliError, CliResult};

// Import and re-export types from knowledge_memory
pub use knowledge_memory::{
    Category, FlowMetrics, HeatDecay, KnowledgeNode, KnowledgeSearch, Metadata, NodeStore,
    SearchConfig, SearchResult, StoreStats,
};

/// Knowledge manager for the host process
///
/// Constructed empty, then initialized once with an [`IndexConfig`]. Every
/// operation before initialization fails with [`CliError::NotInitialized`].
pub struct KnowledgeManager {
    store: Arc<RwLock<Option<Arc<NodeStore>>>>,
    decay: Arc<RwLock<HeatDecay>>,
}

impl Default for KnowledgeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeManager {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(None)),
            decay: Arc::new(RwLock::new(HeatDecay::disabled())),
        }
    }

    /// Initialize the node store
    ///
    /// Opens the configured backend, loads persisted history and applies
    /// bootstrap seeding. Backend construction errors (for example an
    /// unwritable data directory) are returned; load errors are not.
    pub async fn initialize(&self, config: &IndexConfig) -> CliResult<()> {
        tracing::info!("[KnowledgeManager::initialize] Backend: {}", config.backend);
        if config.backend.uses_data_dir() {
            tracing::info!(
                "[KnowledgeManager::initialize] Data directory: {:?}",
                config.data_dir
            );
        }

        let store = config.open_store().map_err(|e| {
            tracing::error!("[KnowledgeManager::initialize] Store creation failed: {:?}", e);
            e
        })?;

        tracing::info!(
            "[KnowledgeManager::initialize] Store ready on {} with {} nodes",
            store.backend_description(),
            store.len()
        );

        *self.decay.write().await = config.decay();
        *self.store.write().await = Some(Arc::new(store));
        Ok(())
    }

    /// Initialize with an already constructed store
    pub async fn initialize_with(&self, store: NodeStore) {
        *self.store.write().await = Some(Arc::new(store));
    }

    /// Check if the store is initialized
    pub async fn is_initialized(&self) -> bool {
        self.store.read().await.is_some()
    }

    /// Record a new node
    pub async fn record(
        &self,
        content: String,
        category: Category,
        metadata: Option<Metadata>,
    ) -> CliResult<KnowledgeNode> {
        let store = self.get_store().await?;
        Ok(store.record(content, category, metadata))
    }

    /// Most recent nodes, newest first
    pub async fn recent(&self, limit: usize) -> CliResult<Vec<KnowledgeNode>> {
        let store = self.get_store().await?;
        Ok(store.recent(limit))
    }

    /// Nodes in any of the given categories
    pub async fn by_categories(&self, categories: &[Category]) -> CliResult<Vec<KnowledgeNode>> {
        let store = self.get_store().await?;
        Ok(store.by_categories(categories))
    }

    /// Remove all nodes
    pub async fn clear(&self) -> CliResult<()> {
        let store = self.get_store().await?;
        store.clear();
        Ok(())
    }

    /// Heat-ranked substring search using the configured decay
    pub async fn search(&self, query: &str, limit: Option<usize>) -> CliResult<Vec<SearchResult>> {
        let search = self.get_search().await?;
        let config = SearchConfig {
            limit,
            decay: *self.decay.read().await,
        };
        Ok(search.search_with(query, &config))
    }

    pub async fn documentation_nodes(&self) -> CliResult<Vec<KnowledgeNode>> {
        Ok(self.get_search().await?.documentation_nodes())
    }

    pub async fn workflow_nodes(&self) -> CliResult<Vec<KnowledgeNode>> {
        Ok(self.get_search().await?.workflow_nodes())
    }

    pub async fn flow_metrics(&self) -> CliResult<FlowMetrics> {
        Ok(self.get_search().await?.flow_metrics())
    }

    pub async fn stats(&self) -> CliResult<StoreStats> {
        let store = self.get_store().await?;
        Ok(store.stats())
    }

    async fn get_search(&self) -> CliResult<KnowledgeSearch> {
        Ok(KnowledgeSearch::new(self.get_store().await?))
    }

    /// Get the underlying store, returning error if not initialized
    async fn get_store(&self) -> CliResult<Arc<NodeStore>> {
        self.store
            .read()
            .await
            .clone()
            .ok_or(CliError::NotInitialized)
    }
}
