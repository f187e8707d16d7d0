//! Knowledge index command handlers.
//!
//! Request parameters arrive as loosely typed values (strings for categories,
//! `key=value` pairs for metadata) and are validated here before reaching the
//! store, which performs no validation of its own.

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};
use crate::memory::{Category, FlowMetrics, KnowledgeManager, KnowledgeNode, Metadata, StoreStats};

// ==========================================
// Record Request
// ==========================================

/// Parameters for recording a node.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordParams {
    /// Free-text content (may be empty)
    pub content: String,
    /// Category name, validated against the closed set
    pub category: String,
    /// Optional pass-through metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// Response after recording a node.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// The node as stored
    pub node: KnowledgeNode,
    pub success: bool,
}

// ==========================================
// Listing Requests
// ==========================================

/// Parameters for listing recent nodes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentParams {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

fn default_recent_limit() -> usize {
    knowledge_memory::DEFAULT_RECENT_LIMIT
}

/// Parameters for filtering by category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesParams {
    pub categories: Vec<String>,
}

/// A list of nodes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeListResponse {
    pub nodes: Vec<KnowledgeNode>,
    pub total: usize,
}

impl From<Vec<KnowledgeNode>> for NodeListResponse {
    fn from(nodes: Vec<KnowledgeNode>) -> Self {
        Self {
            total: nodes.len(),
            nodes,
        }
    }
}

// ==========================================
// Search Request
// ==========================================

/// Parameters for searching nodes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Substring to look for in content or category
    pub query: String,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A single search hit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub node: KnowledgeNode,
    /// Heat used for ranking (equals `heat` unless decay is configured)
    pub effective_heat: f64,
}

/// Response for search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
}

// ==========================================
// Clear Request
// ==========================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub success: bool,
}

// ==========================================
// Boundary validation
// ==========================================

/// Parse one category name, rejecting anything outside the closed set
pub fn parse_category(name: &str) -> CliResult<Category> {
    name.parse::<Category>().map_err(|_| {
        let valid: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        CliError::invalid_params(format!(
            "unknown category '{}' (expected one of: {})",
            name,
            valid.join(", ")
        ))
    })
}

/// Parse a list of category names
pub fn parse_categories(names: &[String]) -> CliResult<Vec<Category>> {
    names.iter().map(|name| parse_category(name)).collect()
}

/// Parse `key=value` pairs into metadata.
///
/// Values that parse as JSON keep their JSON type; anything else is stored
/// as a string.
pub fn parse_metadata_pairs(pairs: &[String]) -> CliResult<Metadata> {
    let mut metadata = Metadata::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| CliError::invalid_params(format!("metadata '{}' is not key=value", pair)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::invalid_params(format!(
                "metadata '{}' has an empty key",
                pair
            )));
        }
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        metadata.insert(key.to_string(), value);
    }
    Ok(metadata)
}

// ==========================================
// Handlers
// ==========================================

pub async fn handle_record(
    manager: &KnowledgeManager,
    params: RecordParams,
) -> CliResult<RecordResponse> {
    let category = parse_category(&params.category)?;
    let metadata = if params.metadata.is_empty() {
        None
    } else {
        Some(params.metadata)
    };

    let node = manager.record(params.content, category, metadata).await?;
    tracing::debug!("Recorded node {} ({})", node.id, node.category);

    Ok(RecordResponse {
        node,
        success: true,
    })
}

pub async fn handle_recent(
    manager: &KnowledgeManager,
    params: RecentParams,
) -> CliResult<NodeListResponse> {
    Ok(manager.recent(params.limit).await?.into())
}

pub async fn handle_by_categories(
    manager: &KnowledgeManager,
    params: CategoriesParams,
) -> CliResult<NodeListResponse> {
    if params.categories.is_empty() {
        return Err(CliError::invalid_params("at least one category is required"));
    }
    let categories = parse_categories(&params.categories)?;
    Ok(manager.by_categories(&categories).await?.into())
}

pub async fn handle_search(
    manager: &KnowledgeManager,
    params: SearchParams,
) -> CliResult<SearchResponse> {
    let results: Vec<SearchHit> = manager
        .search(&params.query, params.limit)
        .await?
        .into_iter()
        .map(|result| SearchHit {
            node: result.node,
            effective_heat: result.effective_heat,
        })
        .collect();

    Ok(SearchResponse {
        total: results.len(),
        results,
    })
}

pub async fn handle_documentation(manager: &KnowledgeManager) -> CliResult<NodeListResponse> {
    Ok(manager.documentation_nodes().await?.into())
}

pub async fn handle_workflow(manager: &KnowledgeManager) -> CliResult<NodeListResponse> {
    Ok(manager.workflow_nodes().await?.into())
}

pub async fn handle_metrics(manager: &KnowledgeManager) -> CliResult<FlowMetrics> {
    manager.flow_metrics().await
}

pub async fn handle_stats(manager: &KnowledgeManager) -> CliResult<StoreStats> {
    manager.stats().await
}

pub async fn handle_clear(manager: &KnowledgeManager) -> CliResult<ClearResponse> {
    manager.clear().await?;
    Ok(ClearResponse { success: true })
}
