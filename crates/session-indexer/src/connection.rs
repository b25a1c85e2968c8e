//! Read-write database connection for the session index

use rusqlite::{Connection, OpenFlags};
use session_core::{ContentKind, ParseFailure};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema;

/// Index errors
///
/// `QuerySyntax` is a caller mistake and should not be retried. `Storage`
/// and `Io` come from the engine or the disk and may succeed on retry.
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl IndexerError {
    pub fn is_query_error(&self) -> bool {
        matches!(self, IndexerError::QuerySyntax(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            IndexerError::Storage(_) | IndexerError::Io(_) | IndexerError::Schema(_)
        )
    }
}

/// Default database path
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".session-index")
        .join("search-index.db")
}

/// Read-write connection to the index database
pub struct IndexStore {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl IndexStore {
    /// Open or create the database at a specific path
    pub fn open_or_create(path: &Path) -> Result<Self, IndexerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // WAL lets searches read a committed snapshot while a build writes
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = OFF;",
        )?;

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// In-memory index, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, IndexerError> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self, IndexerError> {
        schema::init_schema(&mut conn)?;
        Ok(Self { conn, path })
    }

    /// Database path (`None` for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a transaction
    pub fn transaction<F, T>(&mut self, f: F) -> Result<T, IndexerError>
    where
        F: FnOnce(&Connection) -> Result<T, IndexerError>,
    {
        let tx = self.conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Record a metadata value (e.g. `last_indexed`)
    pub fn set_metadata(&self, key: &str, value: &str) -> Result<(), IndexerError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    pub fn metadata(&self, key: &str) -> Result<Option<String>, IndexerError> {
        match self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            }) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get index statistics
    pub fn stats(&self) -> Result<IndexStats, IndexerError> {
        let version: i32 = self
            .metadata("version")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let transcript_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;

        let entry_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;

        let mut entries_by_kind = Vec::with_capacity(ContentKind::ALL.len());
        for kind in ContentKind::ALL {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM entries WHERE content_type = ?1",
                [kind.as_str()],
                |row| row.get(0),
            )?;
            entries_by_kind.push((kind, count));
        }

        let db_size_bytes = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(IndexStats {
            version,
            transcript_count,
            entry_count,
            entries_by_kind,
            last_indexed: self.metadata("last_indexed")?,
            db_path: self.path.clone(),
            db_size_bytes,
        })
    }
}

/// Index statistics
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub version: i32,
    pub transcript_count: i64,
    pub entry_count: i64,
    pub entries_by_kind: Vec<(ContentKind, i64)>,
    pub last_indexed: Option<String>,
    pub db_path: Option<PathBuf>,
    pub db_size_bytes: u64,
}

impl IndexStats {
    pub fn count_for(&self, kind: ContentKind) -> i64 {
        self.entries_by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}
