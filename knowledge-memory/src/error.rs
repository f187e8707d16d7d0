//! Error types for knowledge-memory

use thiserror::Error;

/// Errors that can occur in the knowledge index
///
/// Store operations never surface these to callers; they are produced by
/// persistence backends and ingestion-boundary parsing.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// RocksDB error
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Category name outside the closed set
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Unknown persistence backend name
    #[error("Invalid backend: {0}")]
    InvalidBackend(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl KnowledgeError {
    /// Create an invalid category error
    pub fn invalid_category(name: impl Into<String>) -> Self {
        Self::InvalidCategory(name.into())
    }

    /// Create an invalid backend error
    pub fn invalid_backend(name: impl Into<String>) -> Self {
        Self::InvalidBackend(name.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for knowledge index operations
pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_category_display() {
        let err = KnowledgeError::invalid_category("gossip");
        assert_eq!(err.to_string(), "Invalid category: gossip");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: KnowledgeError = io_err.into();
        assert!(matches!(err, KnowledgeError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: KnowledgeError = json_err.into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
