//! Core type definitions for session transcript data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of characters shown in a content preview
pub const PREVIEW_CHARS: usize = 200;

/// Kind of searchable content extracted from a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// A user request block (`**Command/Request:**`)
    Prompt,
    /// An output block (`**Output/Response:**`)
    Response,
    /// A single `- [HH:MM:SS] ... **Created:**` / `**Modified:**` line
    FileChange,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Prompt,
        ContentKind::Response,
        ContentKind::FileChange,
    ];

    /// Value stored in the `content_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Prompt => "prompt",
            ContentKind::Response => "response",
            ContentKind::FileChange => "file_change",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known content kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown content type '{}' (expected prompt, response or file_change)",
            self.0
        )
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for ContentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(ContentKind::Prompt),
            "response" => Ok(ContentKind::Response),
            "file_change" => Ok(ContentKind::FileChange),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// One unit of searchable content extracted from a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub kind: ContentKind,
    pub content: String,
    /// `HH:MM:SS`, same-day assumption
    pub timestamp: Option<String>,
    /// Line number in the source transcript (1-indexed)
    pub line_number: i64,
}

impl ContentEntry {
    pub fn new(
        kind: ContentKind,
        content: impl Into<String>,
        timestamp: Option<String>,
        line_number: i64,
    ) -> Self {
        Self {
            kind,
            content: content.into(),
            timestamp,
            line_number,
        }
    }
}

/// Parser output for one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    pub session_id: String,
    pub entries: Vec<ContentEntry>,
}

/// A transcript row as stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub session_id: String,
    pub file_path: String,
    pub created_date: Option<String>,
    /// Nanoseconds since the Unix epoch
    pub last_modified: i64,
    pub file_hash: String,
}

/// A single ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub session_id: String,
    pub kind: ContentKind,
    pub content: String,
    pub timestamp: Option<String>,
    pub line_number: i64,
}

impl SearchHit {
    /// Content truncated to [`PREVIEW_CHARS`] characters, with `...` appended when cut
    pub fn preview(&self) -> String {
        preview(&self.content, PREVIEW_CHARS)
    }
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
