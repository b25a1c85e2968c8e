//! CLI command implementations

pub mod index;
pub mod search;

use anyhow::{Context, Result};
use session_indexer::{IndexStore, Indexer};
use tracing::debug;

use crate::cli::Cli;

/// Open (creating if needed) the configured index
fn open_indexer(cli: &Cli) -> Result<Indexer> {
    let db_path = cli.db_path();
    debug!(db = %db_path.display(), "opening index");
    let store = IndexStore::open_or_create(&db_path)
        .with_context(|| format!("Failed to open index at {}", db_path.display()))?;
    Ok(Indexer::new(store, cli.sessions_dir()))
}
