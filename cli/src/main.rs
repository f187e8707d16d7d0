//! Knowledge Index Entry Point
//!
//! Opens the configured store, runs one command against it and prints the
//! JSON response on stdout. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use knowledge_index::config::{IndexConfig, DEFAULT_DATA_DIR};
use knowledge_index::handlers::{self, CategoriesParams, RecentParams, RecordParams, SearchParams};
use knowledge_index::{CliResult, KnowledgeManager};
use knowledge_memory::BackendKind;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "knowledge-index")]
#[command(about = "Append-only knowledge memory index with heat-ranked search")]
#[command(version)]
struct Args {
    /// Persistence backend: none, memory, file or rocksdb
    #[arg(long, global = true, env = "KNOWLEDGE_INDEX_BACKEND", default_value = "file")]
    backend: BackendKind,

    /// Directory holding the persisted slot
    #[arg(long, global = true, env = "KNOWLEDGE_INDEX_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Do not seed an empty store with the starter academy node
    #[arg(long, global = true)]
    no_bootstrap: bool,

    /// Rank search results with heat halving every N hours
    #[arg(long, global = true)]
    half_life_hours: Option<f64>,

    /// Verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new knowledge node
    Record {
        /// Node content
        content: String,
        /// Category (preference, logic, insight, technical, workflow,
        /// academy, document, link, image, written)
        #[arg(long, short)]
        category: String,
        /// Metadata entry as key=value (repeatable)
        #[arg(long = "meta", short)]
        meta: Vec<String>,
    },
    /// Most recent nodes, newest first
    Recent {
        #[arg(long, short, default_value_t = knowledge_memory::DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// Case-insensitive search over content and category, hottest first
    Search {
        query: String,
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Nodes in the given categories, in insertion order
    Categories {
        #[arg(long = "category", short, required = true)]
        categories: Vec<String>,
    },
    /// Documentation nodes
    Docs,
    /// Workflow nodes
    Workflow,
    /// Flow metrics derived from documentation coverage
    Metrics,
    /// Node counts per category
    Stats,
    /// Remove every node
    Clear,
}

impl Args {
    fn index_config(&self) -> IndexConfig {
        IndexConfig {
            backend: self.backend,
            data_dir: self.data_dir.clone(),
            bootstrap: !self.no_bootstrap,
            half_life_hours: self.half_life_hours,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_filter = if args.verbose {
        "knowledge_index=debug,knowledge_memory=debug"
    } else {
        "knowledge_index=info,knowledge_memory=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> CliResult<()> {
    let manager = KnowledgeManager::new();
    manager.initialize(&args.index_config()).await?;

    match args.command {
        Command::Record {
            content,
            category,
            meta,
        } => {
            let metadata = handlers::parse_metadata_pairs(&meta)?;
            let params = RecordParams {
                content,
                category,
                metadata,
            };
            print_json(&handlers::handle_record(&manager, params).await?)
        }
        Command::Recent { limit } => {
            print_json(&handlers::handle_recent(&manager, RecentParams { limit }).await?)
        }
        Command::Search { query, limit } => {
            let params = SearchParams { query, limit };
            print_json(&handlers::handle_search(&manager, params).await?)
        }
        Command::Categories { categories } => {
            let params = CategoriesParams { categories };
            print_json(&handlers::handle_by_categories(&manager, params).await?)
        }
        Command::Docs => print_json(&handlers::handle_documentation(&manager).await?),
        Command::Workflow => print_json(&handlers::handle_workflow(&manager).await?),
        Command::Metrics => print_json(&handlers::handle_metrics(&manager).await?),
        Command::Stats => print_json(&handlers::handle_stats(&manager).await?),
        Command::Clear => print_json(&handlers::handle_clear(&manager).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    write_json(&mut std::io::stdout().lock(), value)
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_record_command() {
        let args = Args::parse_from([
            "knowledge-index",
            "--backend",
            "memory",
            "record",
            "Brand Guidelines 2024.pdf",
            "--category",
            "document",
            "--meta",
            "pages=12",
        ]);

        assert_eq!(args.backend, BackendKind::Memory);
        match args.command {
            Command::Record {
                content,
                category,
                meta,
            } => {
                assert_eq!(content, "Brand Guidelines 2024.pdf");
                assert_eq!(category, "document");
                assert_eq!(meta, vec!["pages=12".to_string()]);
            }
            _ => panic!("Expected record command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "knowledge-index",
            "search",
            "flow",
            "--no-bootstrap",
            "--half-life-hours",
            "48",
        ]);

        let config = args.index_config();
        assert!(!config.bootstrap);
        assert_eq!(config.half_life_hours, Some(48.0));
        assert!(matches!(args.command, Command::Search { .. }));
    }

    #[test]
    fn test_recent_default_limit() {
        let args = Args::parse_from(["knowledge-index", "recent"]);
        match args.command {
            Command::Recent { limit } => assert_eq!(limit, 5),
            _ => panic!("Expected recent command"),
        }
    }

    #[test]
    fn test_write_json_is_pretty_with_trailing_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"efficiency": 65})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"efficiency\": 65\n}\n");
    }

    #[test]
    fn test_write_json_reports_io_errors() {
        struct ClosedPipe;

        impl Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_json(&mut ClosedPipe, &serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, knowledge_index::CliError::Json(_) | knowledge_index::CliError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let result = Args::try_parse_from(["knowledge-index", "--backend", "redis", "docs"]);
        assert!(result.is_err());
    }
}
