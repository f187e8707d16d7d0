//! Knowledge Index Host Library
//!
//! Process-level wiring for the knowledge memory index: configuration,
//! the owned store handle, and the command handlers the binary dispatches to.

pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;

pub use config::IndexConfig;
pub use error::{CliError, CliResult};
pub use memory::KnowledgeManager;
