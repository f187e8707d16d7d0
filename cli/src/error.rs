//! Error types for the knowledge index host.

use knowledge_memory::KnowledgeError;
use thiserror::Error;

/// Errors that can occur while serving index commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Knowledge store not initialized")]
    NotInitialized,

    #[error("Invalid parameter: {0}")]
    InvalidParams(String),

    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidParams(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for host operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display_not_initialized() {
        assert_eq!(
            CliError::NotInitialized.to_string(),
            "Knowledge store not initialized"
        );
    }

    #[test]
    fn test_cli_error_display_invalid_params() {
        let err = CliError::invalid_params("unknown category: gossip");
        assert_eq!(err.to_string(), "Invalid parameter: unknown category: gossip");
    }

    #[test]
    fn test_from_knowledge_error() {
        let err: CliError = KnowledgeError::invalid_backend("redis").into();
        assert!(matches!(err, CliError::Knowledge(_)));
        assert!(err.to_string().contains("Invalid backend: redis"));
    }

    #[test]
    fn test_from_output_errors() {
        let err: CliError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, CliError::Io(_)));

        let err: CliError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CliError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::invalid_params("x").exit_code(), 2);
        assert_eq!(CliError::NotInitialized.exit_code(), 1);
    }
}
