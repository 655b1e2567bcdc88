//! Command-line entry point: run one registry operation against a SQLite
//! ledger and print its payload.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use verify_registry::store::{SqliteConfig, SqliteStore};
use verify_registry::{Registry, RegistryConfig};

#[derive(Debug, Parser)]
#[command(name = "verify-registry", version, about = "Document and admin registry")]
struct Cli {
    /// SQLite database file. Uses a throwaway in-memory ledger when omitted.
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON registry configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows fetched per page while iterating a query.
    #[arg(long, default_value_t = SqliteConfig::default().page_size)]
    page_size: usize,

    /// Operation name, e.g. addDocument or queryAdmin.
    operation: String,

    /// Positional operation arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RegistryConfig::from_file(path)?,
        None => RegistryConfig::default(),
    };

    let store = match &cli.db {
        Some(path) => SqliteStore::open(path)
            .with_context(|| format!("opening ledger {}", path.display()))?,
        None => SqliteStore::open_memory()?,
    }
    .with_config(SqliteConfig {
        page_size: cli.page_size,
    });

    let registry = Registry::new(store, config);
    if let Some(payload) = registry.invoke(&cli.operation, &cli.args).await? {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&payload)?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
