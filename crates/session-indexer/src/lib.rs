//! session-indexer - Incremental search index for session transcripts
//!
//! This crate owns the SQLite index file: schema creation, change detection,
//! atomic per-session entry replacement, and ranked FTS5 search. The
//! [`Indexer`] drives a build pass over a sessions directory and is the
//! entry point used by the CLI.

pub mod connection;
pub mod discovery;
pub mod fingerprint;
pub mod indexer;
pub mod schema;
pub mod search;
pub mod store;

pub use connection::{default_db_path, IndexStats, IndexStore, IndexerError};
pub use discovery::{default_sessions_dir, find_session_files};
pub use fingerprint::{stamp_file, FileStamp};
pub use indexer::{validate_query, BuildOutcome, BuildReport, Indexer};
pub use schema::{init_schema, DB_VERSION};
pub use search::{SearchOptions, DEFAULT_SEARCH_LIMIT};
