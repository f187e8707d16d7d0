//! Ranking and metrics engine
//!
//! Read-only derivations over a [`NodeStore`]: case-insensitive substring
//! search ordered by heat, curated category views, and flow metrics. Every
//! operation works on a snapshot and never mutates the store.

use std::sync::Arc;

use chrono::Utc;

use crate::metrics::FlowMetrics;
use crate::node::{Category, KnowledgeNode};
use crate::storage::NodeStore;
use crate::temporal::HeatDecay;

/// Search configuration
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Maximum results to return (`None` for all matches)
    pub limit: Option<usize>,
    /// Read-time decay used for ranking (disabled by default)
    pub decay: HeatDecay,
}

impl SearchConfig {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_decay(mut self, decay: HeatDecay) -> Self {
        self.decay = decay;
        self
    }
}

/// Search result with the heat used for ranking
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched node
    pub node: KnowledgeNode,
    /// Stored heat, or decayed heat when decay is enabled
    pub effective_heat: f64,
}

/// Ranking engine bound to one store
pub struct KnowledgeSearch {
    store: Arc<NodeStore>,
}

impl KnowledgeSearch {
    pub fn new(store: Arc<NodeStore>) -> Self {
        Self { store }
    }

    /// Nodes whose content or category contains `query`, hottest first.
    ///
    /// Ties keep insertion order. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<KnowledgeNode> {
        self.search_with(query, &SearchConfig::default())
            .into_iter()
            .map(|result| result.node)
            .collect()
    }

    /// [`search`](Self::search) with a limit and optional decay
    pub fn search_with(&self, query: &str, config: &SearchConfig) -> Vec<SearchResult> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let now = Utc::now();
        let snapshot = self.store.snapshot();

        let mut results: Vec<SearchResult> = snapshot
            .iter()
            .filter(|node| node.matches_lowercase(&needle))
            .map(|node| SearchResult {
                effective_heat: config.decay.effective_heat(node, now),
                node: node.clone(),
            })
            .collect();

        // sort_by is stable, so equal heat keeps insertion order.
        results.sort_by(|a, b| b.effective_heat.total_cmp(&a.effective_heat));

        if let Some(limit) = config.limit {
            results.truncate(limit);
        }

        log::debug!("Search {:?} matched {} nodes", query, results.len());
        results
    }

    /// Nodes in the reference-material categories, in insertion order
    pub fn documentation_nodes(&self) -> Vec<KnowledgeNode> {
        self.store.by_categories(&Category::DOCUMENTATION)
    }

    /// Workflow nodes, in insertion order
    pub fn workflow_nodes(&self) -> Vec<KnowledgeNode> {
        self.store.by_categories(&[Category::Workflow])
    }

    /// Flow metrics for the current documentation count
    pub fn flow_metrics(&self) -> FlowMetrics {
        let snapshot = self.store.snapshot();
        let document_count = snapshot
            .iter()
            .filter(|node| node.category.is_documentation())
            .count();
        FlowMetrics::from_document_count(document_count)
    }
}
