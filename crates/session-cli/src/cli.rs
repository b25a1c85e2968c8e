//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use session_core::ContentKind;
use session_indexer::{default_db_path, default_sessions_dir, DEFAULT_SEARCH_LIMIT};
use std::path::PathBuf;

/// Build and search the session transcript index
#[derive(Parser, Debug)]
#[command(name = "session-index")]
#[command(version)]
#[command(about = "Build and search the session transcript index")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Custom database path
    #[arg(long, global = true, env = "SESSION_INDEX_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory containing session-<id>.md transcripts
    #[arg(long, global = true, env = "SESSION_INDEX_DIR")]
    pub sessions_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.sessions_dir.clone().unwrap_or_else(default_sessions_dir)
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output (one object per line for lists)
    Json,
    /// Minimal text output (content only)
    Minimal,
}

/// Content type filter for search
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Prompt,
    Response,
    #[value(name = "file_change")]
    FileChange,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Prompt => ContentKind::Prompt,
            KindArg::Response => ContentKind::Response,
            KindArg::FileChange => ContentKind::FileChange,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index new or changed transcripts
    Build {
        /// Reindex every transcript, changed or not
        #[arg(long, short = 'F')]
        force: bool,
    },

    /// Reindex every transcript (same as build --force)
    Rebuild,

    /// Full-text search over indexed transcripts
    Search {
        /// Search query (FTS5 syntax)
        #[arg(long, short)]
        query: Option<String>,

        /// Restrict results to one content type
        #[arg(long = "type", short = 't')]
        kind: Option<KindArg>,

        /// Maximum number of results
        #[arg(long, short, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: i64,

        /// Restrict results to one session id
        #[arg(long, short)]
        session: Option<String>,
    },

    /// Show index status and statistics
    Status,
}
