//! Knowledge node types and builders
//!
//! Core types for representing recorded knowledge fragments.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::KnowledgeError;

/// Heat assigned to freshly recorded nodes
pub const MAX_HEAT: f64 = 1.0;

/// Open pass-through metadata bag, never interpreted by the store
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Unique identifier for knowledge nodes
///
/// Backed by a UUIDv7, so identifiers minted later in the same process sort
/// after earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new time-ordered NodeId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Closed set of knowledge categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Preference,
    Logic,
    Insight,
    Technical,
    Workflow,
    Academy,
    Document,
    Link,
    Image,
    Written,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 10] = [
        Category::Preference,
        Category::Logic,
        Category::Insight,
        Category::Technical,
        Category::Workflow,
        Category::Academy,
        Category::Document,
        Category::Link,
        Category::Image,
        Category::Written,
    ];

    /// Categories treated as durable reference material
    pub const DOCUMENTATION: [Category; 6] = [
        Category::Workflow,
        Category::Academy,
        Category::Document,
        Category::Link,
        Category::Image,
        Category::Written,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preference => "preference",
            Self::Logic => "logic",
            Self::Insight => "insight",
            Self::Technical => "technical",
            Self::Workflow => "workflow",
            Self::Academy => "academy",
            Self::Document => "document",
            Self::Link => "link",
            Self::Image => "image",
            Self::Written => "written",
        }
    }

    pub fn is_documentation(&self) -> bool {
        Self::DOCUMENTATION.contains(self)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = KnowledgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| KnowledgeError::invalid_category(s))
    }
}

/// A single recorded fragment of knowledge
///
/// Nodes are immutable once they enter the store. Field names serialize in
/// camelCase and form the persisted slot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Category from the closed set
    pub category: Category,
    /// Free-text payload
    pub content: String,
    /// Creation time, set once
    pub created_at: DateTime<Utc>,
    /// Relevance weight (0.0 to 1.0)
    pub heat: f64,
    /// Pass-through metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl KnowledgeNode {
    /// Create a fresh node at full heat
    pub fn new(content: impl Into<String>, category: Category, metadata: Metadata) -> Self {
        Self {
            id: NodeId::new(),
            category,
            content: content.into(),
            created_at: Utc::now(),
            heat: MAX_HEAT,
            metadata,
        }
    }

    /// Create a new builder for KnowledgeNode
    pub fn builder() -> KnowledgeNodeBuilder {
        KnowledgeNodeBuilder::new()
    }

    /// Case-insensitive substring match against content or category.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.category.as_str().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Builder for KnowledgeNode with fluent API
#[derive(Debug, Default)]
pub struct KnowledgeNodeBuilder {
    id: Option<NodeId>,
    category: Option<Category>,
    content: Option<String>,
    created_at: Option<DateTime<Utc>>,
    heat: Option<f64>,
    metadata: Metadata,
}

impl KnowledgeNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node ID (auto-generated if not set)
    pub fn id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Override the creation time (defaults to now)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Set heat, clamped to 0.0..=1.0
    pub fn heat(mut self, heat: f64) -> Self {
        self.heat = Some(heat.clamp(0.0, MAX_HEAT));
        self
    }

    /// Add one metadata entry
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace the metadata bag
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Build the KnowledgeNode
    pub fn build(self) -> Result<KnowledgeNode, KnowledgeNodeBuilderError> {
        let category = self
            .category
            .ok_or(KnowledgeNodeBuilderError::MissingCategory)?;
        let content = self
            .content
            .ok_or(KnowledgeNodeBuilderError::MissingContent)?;

        Ok(KnowledgeNode {
            id: self.id.unwrap_or_default(),
            category,
            content,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            heat: self.heat.unwrap_or(MAX_HEAT),
            metadata: self.metadata,
        })
    }
}

/// Errors that can occur when building a KnowledgeNode
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeNodeBuilderError {
    #[error("Missing required field: category")]
    MissingCategory,
    #[error("Missing required field: content")]
    MissingContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generation() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_node_ids_are_time_ordered() {
        let ids: Vec<NodeId> = (0..64).map(|_| NodeId::new()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_node_id_parse() {
        let id = NodeId::new();
        let parsed: NodeId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_node_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = NodeId::from_uuid(uuid);
        assert_eq!(id.0, uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("workflow".parse::<Category>().unwrap(), Category::Workflow);
        assert_eq!(" Academy ".parse::<Category>().unwrap(), Category::Academy);
        assert!(matches!(
            "gossip".parse::<Category>(),
            Err(KnowledgeError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_category_round_trips_through_as_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_documentation_categories() {
        assert!(Category::Written.is_documentation());
        assert!(Category::Workflow.is_documentation());
        assert!(!Category::Insight.is_documentation());
        assert!(!Category::Technical.is_documentation());
    }

    #[test]
    fn test_new_node_starts_hot() {
        let node = KnowledgeNode::new("Prefers dark mode", Category::Preference, Metadata::new());
        assert_eq!(node.heat, MAX_HEAT);
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn test_builder_clamps_heat() {
        let node = KnowledgeNode::builder()
            .category(Category::Insight)
            .content("Churn spikes in Q3")
            .heat(3.0)
            .build()
            .unwrap();
        assert_eq!(node.heat, 1.0);
    }

    #[test]
    fn test_builder_keeps_explicit_id() {
        let id: NodeId = "01890a5d-ac96-774b-bcce-b302099a8057".parse().unwrap();
        let node = KnowledgeNode::builder()
            .id(id)
            .category(Category::Link)
            .content("https://example.com/handbook")
            .build()
            .unwrap();
        assert_eq!(node.id, id);
    }

    #[test]
    fn test_builder_missing_required() {
        let result = KnowledgeNode::builder().content("orphan").build();
        assert!(matches!(
            result,
            Err(KnowledgeNodeBuilderError::MissingCategory)
        ));
    }

    #[test]
    fn test_matches_lowercase() {
        let node = KnowledgeNode::new("Mastering the Flow Engine", Category::Academy, Metadata::new());
        assert!(node.matches_lowercase("flow"));
        assert!(node.matches_lowercase("acad"));
        assert!(!node.matches_lowercase("pricing"));
    }

    #[test]
    fn test_serialized_field_names() {
        let node = KnowledgeNode::builder()
            .category(Category::Link)
            .content("https://example.com/handbook")
            .meta("source", "crawler")
            .build()
            .unwrap();

        let value = serde_json::to_value(&node).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["category", "content", "createdAt", "heat", "id", "metadata"]
        );
        assert_eq!(object["category"], "link");
        assert_eq!(object["metadata"]["source"], "crawler");
    }

    #[test]
    fn test_node_serialization() {
        let node = KnowledgeNode::builder()
            .category(Category::Document)
            .content("Brand Guidelines 2024.pdf")
            .heat(0.8)
            .meta("pages", 42)
            .build()
            .unwrap();

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: KnowledgeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, deserialized);
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty() {
        let json = r#"{
            "id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "category": "insight",
            "content": "Users skim",
            "createdAt": "2024-05-01T10:00:00Z",
            "heat": 0.7
        }"#;
        let node: KnowledgeNode = serde_json::from_str(json).unwrap();
        assert!(node.metadata.is_empty());
        assert_eq!(node.category, Category::Insight);
    }
}
