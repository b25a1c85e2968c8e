//! Database schema creation and version check

use rusqlite::Connection;
use tracing::debug;

use crate::connection::IndexerError;

/// Current database schema version
pub const DB_VERSION: i32 = 1;

/// Initialize the database schema. Safe to run on every open.
pub fn init_schema(conn: &mut Connection) -> Result<(), IndexerError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
    )?;

    check_version(conn)?;

    // One row per transcript, keyed by session id
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY,
            session_id TEXT NOT NULL UNIQUE,
            file_path TEXT NOT NULL,
            created_date TEXT,
            last_modified INTEGER NOT NULL,
            file_hash TEXT NOT NULL,
            indexed_at TEXT NOT NULL
        )",
    )?;

    // One row per parsed content entry
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT NOT NULL,
            content_type TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TEXT,
            line_number INTEGER NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(session_id)
        );
        CREATE INDEX IF NOT EXISTS idx_entries_session_id ON entries(session_id);
        CREATE INDEX IF NOT EXISTS idx_entries_content_type ON entries(content_type);",
    )?;

    // FTS5 over entry content; the other columns ride along for filtering
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS entries_fts USING fts5(
            content,
            content_type UNINDEXED,
            session_id UNINDEXED,
            timestamp UNINDEXED,
            content='entries',
            content_rowid='id'
        )",
    )?;

    // Triggers keep entries_fts in lockstep with entries, inside the
    // same transaction as the write that fired them
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS entries_ai AFTER INSERT ON entries BEGIN
            INSERT INTO entries_fts(rowid, content, content_type, session_id, timestamp)
            VALUES (new.id, new.content, new.content_type, new.session_id, new.timestamp);
        END;

        CREATE TRIGGER IF NOT EXISTS entries_ad AFTER DELETE ON entries BEGIN
            INSERT INTO entries_fts(entries_fts, rowid, content, content_type, session_id, timestamp)
            VALUES ('delete', old.id, old.content, old.content_type, old.session_id, old.timestamp);
        END;

        CREATE TRIGGER IF NOT EXISTS entries_au AFTER UPDATE ON entries BEGIN
            INSERT INTO entries_fts(entries_fts, rowid, content, content_type, session_id, timestamp)
            VALUES ('delete', old.id, old.content, old.content_type, old.session_id, old.timestamp);
            INSERT INTO entries_fts(rowid, content, content_type, session_id, timestamp)
            VALUES (new.id, new.content, new.content_type, new.session_id, new.timestamp);
        END;",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('version', ?1)",
        [&DB_VERSION.to_string()],
    )?;

    debug!(version = DB_VERSION, "schema ready");
    Ok(())
}

/// Refuse to open an index written by a newer schema
fn check_version(conn: &Connection) -> Result<(), IndexerError> {
    let stored: Option<i32> = conn
        .query_row(
            "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .ok();

    match stored {
        Some(v) if v > DB_VERSION => Err(IndexerError::Schema(format!(
            "index was created by schema v{}, this build supports v{}",
            v, DB_VERSION
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_fresh_schema_creates_all_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"metadata".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
        assert!(tables.contains(&"entries".to_string()));
        assert!(tables.contains(&"entries_fts".to_string()));

        let version: i32 = conn
            .query_row(
                "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, DB_VERSION);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();
        init_schema(&mut conn).unwrap();
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = ?1 WHERE key = 'version'",
            [(DB_VERSION + 1).to_string()],
        )
        .unwrap();

        let err = init_schema(&mut conn).unwrap_err();
        assert!(matches!(err, IndexerError::Schema(_)));
    }

    #[test]
    fn test_entries_table_columns() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(entries)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for col in ["id", "session_id", "content_type", "content", "timestamp", "line_number"] {
            assert!(columns.contains(&col.to_string()), "Missing column: {}", col);
        }
    }

    #[test]
    fn test_triggers_mirror_inserts_and_deletes() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO entries (session_id, content_type, content, timestamp, line_number)
             VALUES ('s1', 'prompt', 'mirrored text', NULL, 1)",
            [],
        )
        .unwrap();
        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM entries_fts WHERE entries_fts MATCH 'mirrored'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 1);

        conn.execute("DELETE FROM entries WHERE session_id = 's1'", [])
            .unwrap();
        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM entries_fts WHERE entries_fts MATCH 'mirrored'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 0);
    }
}
