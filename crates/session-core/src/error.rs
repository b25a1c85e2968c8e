//! Error types for transcript reading

use std::path::PathBuf;
use thiserror::Error;

/// A transcript could not be turned into entries
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transcript is not valid UTF-8: {path}")]
    Decode { path: PathBuf },

    #[error("Not a session transcript (expected session-<id>.md): {path}")]
    InvalidName { path: PathBuf },
}
