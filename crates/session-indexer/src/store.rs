//! Transcript and entry persistence

use rusqlite::{params, OptionalExtension, Row};
use session_core::{created_date, ContentEntry, ContentKind, TranscriptRecord};
use std::path::Path;

use crate::connection::{IndexStore, IndexerError};
use crate::fingerprint::FileStamp;

impl IndexStore {
    /// Create or overwrite the transcript row for `session_id`
    pub fn upsert_transcript(
        &self,
        session_id: &str,
        path: &Path,
        stamp: &FileStamp,
    ) -> Result<(), IndexerError> {
        let now = chrono::Utc::now().to_rfc3339();
        let file_path = path.to_string_lossy().to_string();
        self.conn.execute(
            "INSERT INTO sessions
             (session_id, file_path, created_date, last_modified, file_hash, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(session_id) DO UPDATE SET
                file_path = excluded.file_path,
                created_date = excluded.created_date,
                last_modified = excluded.last_modified,
                file_hash = excluded.file_hash,
                indexed_at = excluded.indexed_at",
            params![
                session_id,
                file_path,
                created_date(session_id),
                stamp.modified,
                stamp.fingerprint,
                now,
            ],
        )?;
        Ok(())
    }

    /// Replace every entry of `session_id` with `entries` in one transaction.
    /// The FTS triggers fire inside the same transaction, so readers see
    /// either the old set or the new set.
    pub fn replace_entries(
        &mut self,
        session_id: &str,
        entries: &[ContentEntry],
    ) -> Result<usize, IndexerError> {
        self.transaction(|tx| {
            tx.execute("DELETE FROM entries WHERE session_id = ?1", [session_id])?;

            let mut insert = tx.prepare_cached(
                "INSERT INTO entries (session_id, content_type, content, timestamp, line_number)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for entry in entries {
                insert.execute(params![
                    session_id,
                    entry.kind.as_str(),
                    entry.content,
                    entry.timestamp,
                    entry.line_number,
                ])?;
            }
            Ok(entries.len())
        })
    }

    /// True when the transcript is unknown or its mtime or hash differ from
    /// what was stored. Read-only.
    pub fn needs_reindex(&self, session_id: &str, stamp: &FileStamp) -> Result<bool, IndexerError> {
        let stored: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT last_modified, file_hash FROM sessions WHERE session_id = ?1",
                [session_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(match stored {
            None => true,
            Some((modified, hash)) => modified != stamp.modified || hash != stamp.fingerprint,
        })
    }

    /// Look up a transcript row
    pub fn transcript(&self, session_id: &str) -> Result<Option<TranscriptRecord>, IndexerError> {
        let record = self
            .conn
            .query_row(
                "SELECT session_id, file_path, created_date, last_modified, file_hash
                 FROM sessions WHERE session_id = ?1",
                [session_id],
                row_to_transcript,
            )
            .optional()?;
        Ok(record)
    }

    /// All transcript rows, ordered by session id
    pub fn transcripts(&self) -> Result<Vec<TranscriptRecord>, IndexerError> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, file_path, created_date, last_modified, file_hash
             FROM sessions ORDER BY session_id",
        )?;
        let rows = stmt.query_map([], row_to_transcript)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Entries of one session in source order
    pub fn entries_for_session(&self, session_id: &str) -> Result<Vec<ContentEntry>, IndexerError> {
        let mut stmt = self.conn.prepare(
            "SELECT content_type, content, timestamp, line_number
             FROM entries WHERE session_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map([session_id], |row| {
            Ok(ContentEntry {
                kind: kind_column(row, 0)?,
                content: row.get(1)?,
                timestamp: row.get(2)?,
                line_number: row.get(3)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

fn row_to_transcript(row: &Row<'_>) -> rusqlite::Result<TranscriptRecord> {
    Ok(TranscriptRecord {
        session_id: row.get(0)?,
        file_path: row.get(1)?,
        created_date: row.get(2)?,
        last_modified: row.get(3)?,
        file_hash: row.get(4)?,
    })
}

/// Read a `content_type` column as a [`ContentKind`]
pub(crate) fn kind_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<ContentKind> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
