//! Incremental build pass and search entry point
//!
//! A build walks every `session-*.md` file in the sessions directory in
//! path order. Each transcript is handled on its own: stat + hash, skip if
//! unchanged, otherwise parse, replace its entries, then mark the
//! transcript row current. A failure on one transcript is logged and the
//! pass moves on; because the row is only updated after its entries are
//! committed, the next build retries it.

use session_core::{read_transcript, session_id_from_path, ContentKind, ParseFailure, SearchHit};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::connection::{IndexStore, IndexerError};
use crate::discovery;
use crate::fingerprint::stamp_file;
use crate::search::SearchOptions;

/// Summary of one build pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Transcript files discovered
    pub found: usize,
    /// Transcripts (re)indexed
    pub indexed: usize,
    /// Transcripts skipped because nothing changed
    pub unchanged: usize,
    /// Transcripts skipped because of an error
    pub failed: usize,
    /// Entries written across all indexed transcripts
    pub entries: usize,
}

/// Per-transcript result, passed to progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Indexed { entries: usize },
    Unchanged,
    Failed,
}

/// Reject queries that cannot match anything before touching the store
pub fn validate_query(query: &str) -> Result<&str, IndexerError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(IndexerError::QuerySyntax("query must not be empty".into()));
    }
    Ok(trimmed)
}

/// Index builder and search service over one sessions directory
pub struct Indexer {
    store: IndexStore,
    sessions_dir: PathBuf,
}

impl Indexer {
    pub fn new(store: IndexStore, sessions_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            sessions_dir: sessions_dir.into(),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// Run a build pass. With `force`, every transcript is reparsed.
    pub fn build(&mut self, force: bool) -> Result<BuildReport, IndexerError> {
        self.build_with_progress(force, |_, _, _, _| {})
    }

    /// Run a build pass, calling `on_progress(path, index, total, outcome)`
    /// after each transcript
    pub fn build_with_progress<F>(
        &mut self,
        force: bool,
        mut on_progress: F,
    ) -> Result<BuildReport, IndexerError>
    where
        F: FnMut(&Path, usize, usize, BuildOutcome),
    {
        let files = discovery::find_session_files(&self.sessions_dir);
        let total = files.len();
        let mut report = BuildReport {
            found: total,
            ..Default::default()
        };

        info!(
            dir = %self.sessions_dir.display(),
            count = total,
            force,
            "found session files"
        );

        for (i, file) in files.iter().enumerate() {
            let outcome = match self.index_file(file, force) {
                Ok(Some(entries)) => {
                    report.indexed += 1;
                    report.entries += entries;
                    BuildOutcome::Indexed { entries }
                }
                Ok(None) => {
                    report.unchanged += 1;
                    BuildOutcome::Unchanged
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(file = %file.display(), error = %e, "skipping transcript");
                    BuildOutcome::Failed
                }
            };
            on_progress(file, i + 1, total, outcome);
        }

        let now = chrono::Utc::now().to_rfc3339();
        self.store.set_metadata("last_indexed", &now)?;

        info!(
            indexed = report.indexed,
            unchanged = report.unchanged,
            failed = report.failed,
            "indexing complete"
        );
        Ok(report)
    }

    /// Index one transcript file. Returns the number of entries written, or
    /// `None` when the file is unchanged and `force` is off.
    pub fn index_file(&mut self, path: &Path, force: bool) -> Result<Option<usize>, IndexerError> {
        let session_id = session_id_from_path(path).ok_or_else(|| ParseFailure::InvalidName {
            path: path.to_path_buf(),
        })?;

        let stamp = stamp_file(path)?;
        if !force && !self.store.needs_reindex(&session_id, &stamp)? {
            debug!(session_id = %session_id, "unchanged");
            return Ok(None);
        }

        let parsed = read_transcript(path)?;
        if parsed.entries.is_empty() {
            debug!(session_id = %session_id, "no entries found in transcript");
        }

        // Entries first: the row is only marked current once they are committed
        let written = self.store.replace_entries(&parsed.session_id, &parsed.entries)?;
        self.store.upsert_transcript(&parsed.session_id, path, &stamp)?;

        info!(session_id = %session_id, entries = written, "indexed");
        Ok(Some(written))
    }

    /// Ranked search. Empty queries are rejected without querying the store.
    pub fn search(
        &self,
        query: &str,
        kind: Option<ContentKind>,
        limit: i64,
    ) -> Result<Vec<SearchHit>, IndexerError> {
        let query = validate_query(query)?;
        self.store.search(query, kind, limit)
    }

    /// Search with the full set of options
    pub fn search_with(&self, options: &SearchOptions) -> Result<Vec<SearchHit>, IndexerError> {
        validate_query(&options.query)?;
        self.store.search_with(options)
    }
}
