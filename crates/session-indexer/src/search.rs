//! Ranked full-text search over indexed entries

use rusqlite::ToSql;
use session_core::{ContentKind, SearchHit};

use crate::connection::{IndexStore, IndexerError};
use crate::store::kind_column;

/// Default number of hits returned by a search
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// Options for a full-text search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// FTS5 MATCH expression, passed through unchanged
    pub query: String,
    pub kind: Option<ContentKind>,
    pub session_id: Option<String>,
    pub limit: i64,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: None,
            session_id: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_kind(mut self, kind: Option<ContentKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn for_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }
}

impl IndexStore {
    /// Best-first search, optionally restricted to one content kind
    pub fn search(
        &self,
        query: &str,
        kind: Option<ContentKind>,
        limit: i64,
    ) -> Result<Vec<SearchHit>, IndexerError> {
        self.search_with(&SearchOptions::new(query).with_kind(kind).with_limit(limit))
    }

    /// Search with the full set of options. Ties in bm25 rank fall back to
    /// insertion order so identical inputs give identical output.
    pub fn search_with(&self, options: &SearchOptions) -> Result<Vec<SearchHit>, IndexerError> {
        let mut sql = String::from(
            r#"
            SELECT e.session_id, e.content_type, e.content, e.timestamp, e.line_number
            FROM entries_fts
            JOIN entries e ON entries_fts.rowid = e.id
            WHERE entries_fts MATCH ?
            "#,
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(options.query.clone())];

        if let Some(kind) = options.kind {
            sql.push_str(" AND e.content_type = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(session_id) = &options.session_id {
            sql.push_str(" AND e.session_id = ?");
            params.push(Box::new(session_id.clone()));
        }

        sql.push_str(" ORDER BY bm25(entries_fts), e.id LIMIT ?");
        params.push(Box::new(options.limit.max(0)));

        let mut stmt = self.conn.prepare(&sql).map_err(classify_match_error)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(SearchHit {
                    session_id: row.get(0)?,
                    kind: kind_column(row, 1)?,
                    content: row.get(2)?,
                    timestamp: row.get(3)?,
                    line_number: row.get(4)?,
                })
            })
            .map_err(classify_match_error)?;

        let mut hits = Vec::new();
        for row in rows {
            hits.push(row.map_err(classify_match_error)?);
        }
        Ok(hits)
    }
}

/// FTS5 reports a malformed MATCH expression as a generic SQLite error;
/// pick those out so callers can tell a bad query from a broken store.
fn classify_match_error(err: rusqlite::Error) -> IndexerError {
    if let rusqlite::Error::SqliteFailure(_, Some(message)) = &err {
        let lower = message.to_lowercase();
        let is_query = lower.starts_with("fts5:")
            || lower.contains("syntax error")
            || lower.contains("unterminated string")
            || lower.contains("no such column")
            || lower.contains("unknown special query");
        if is_query {
            return IndexerError::QuerySyntax(message.clone());
        }
    }
    IndexerError::Storage(err)
}
