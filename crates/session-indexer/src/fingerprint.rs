//! Change detection: modification time plus content hash

use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::connection::IndexerError;

/// What the index remembers about a transcript file to decide whether it
/// changed since the last build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    /// Nanoseconds since the Unix epoch
    pub modified: i64,
    /// MD5 hex digest of the file bytes
    pub fingerprint: String,
}

/// Stat and hash a transcript file
pub fn stamp_file(path: &Path) -> Result<FileStamp, IndexerError> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0);

    let bytes = std::fs::read(path)?;
    Ok(FileStamp {
        modified,
        fingerprint: content_hash(&bytes),
    })
}

/// MD5 hex digest
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
