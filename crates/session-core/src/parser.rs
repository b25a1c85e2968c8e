//! Markdown transcript parsing
//!
//! Session transcripts are free-form markdown written by the session logger:
//!
//! ~~~text
//! ### Prompt (10:15:00)
//! **Command/Request:**
//! ```
//! Hello world
//! ```
//! **Output/Response:**
//! ```
//! Hi there!
//! ```
//! ---
//! - [09:30:00] ✅ **Created:** `~/foo/bar.txt`
//! ~~~
//!
//! There is no grammar, so parsing is a line-oriented state machine over
//! textual markers. Timestamps are attached heuristically: the most recent
//! `### Prompt (HH:MM:SS)` header applies to a prompt/response entry when it
//! lies within [`TIMESTAMP_WINDOW`] lines of the entry's start and no nearer
//! preceding `HH:MM:SS` token exists. Otherwise the nearest token within the
//! window is used, and entries with nothing in range get no timestamp.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::ParseFailure;
use crate::types::{ContentEntry, ContentKind, ParsedTranscript};

/// Line that opens a prompt block
pub const REQUEST_MARKER: &str = "**Command/Request:**";
/// Line that closes a prompt block and opens a response block
pub const RESPONSE_MARKER: &str = "**Output/Response:**";
/// Line that closes any open block
pub const BLOCK_SEPARATOR: &str = "---";
/// Lines searched on each side of an entry for a fallback timestamp
pub const TIMESTAMP_WINDOW: usize = 10;

const SESSION_FILE_PREFIX: &str = "session-";
const SESSION_FILE_EXTENSION: &str = "md";

static PROMPT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^### Prompt \((\d{2}:\d{2}:\d{2})\)").unwrap());

static FILE_CHANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \[(\d{2}:\d{2}:\d{2})\].*\*\*(?:Created|Modified):\*\*").unwrap()
});

static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}:\d{2}:\d{2})\b").unwrap());

/// Parser state between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    CapturingPrompt,
    CapturingResponse,
}

impl ParseState {
    fn kind(self) -> Option<ContentKind> {
        match self {
            ParseState::Idle => None,
            ParseState::CapturingPrompt => Some(ContentKind::Prompt),
            ParseState::CapturingResponse => Some(ContentKind::Response),
        }
    }
}

/// What a single transcript line means to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineEvent {
    Request,
    Response,
    PromptHeader(String),
    FileChange(String),
    Separator,
    /// Fences, `**Label:**` lines and blank lines
    Noise,
    Text,
}

fn classify(line: &str) -> LineEvent {
    if line.contains(REQUEST_MARKER) {
        return LineEvent::Request;
    }
    if line.contains(RESPONSE_MARKER) {
        return LineEvent::Response;
    }
    if let Some(caps) = PROMPT_HEADER.captures(line) {
        return LineEvent::PromptHeader(caps[1].to_string());
    }
    if let Some(caps) = FILE_CHANGE.captures(line) {
        return LineEvent::FileChange(caps[1].to_string());
    }

    let trimmed = line.trim();
    if trimmed == BLOCK_SEPARATOR {
        return LineEvent::Separator;
    }
    if trimmed.is_empty() || trimmed.starts_with("**") || trimmed.starts_with("```") {
        return LineEvent::Noise;
    }
    LineEvent::Text
}

struct TranscriptParser<'a> {
    lines: Vec<&'a str>,
    state: ParseState,
    block: Vec<&'a str>,
    /// Most recent prompt header: timestamp and 1-indexed line
    header: Option<(String, usize)>,
    entries: Vec<ContentEntry>,
}

impl<'a> TranscriptParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            state: ParseState::Idle,
            block: Vec::new(),
            header: None,
            entries: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<ContentEntry> {
        for idx in 0..self.lines.len() {
            let line = self.lines[idx];
            let line_number = idx + 1;

            match classify(line) {
                LineEvent::Request => {
                    self.close_block(line_number);
                    self.state = ParseState::CapturingPrompt;
                }
                LineEvent::Response => {
                    self.close_block(line_number);
                    self.state = ParseState::CapturingResponse;
                }
                LineEvent::PromptHeader(ts) => {
                    self.header = Some((ts, line_number));
                }
                LineEvent::FileChange(ts) => {
                    self.entries.push(ContentEntry::new(
                        ContentKind::FileChange,
                        line,
                        Some(ts),
                        line_number as i64,
                    ));
                }
                LineEvent::Separator => {
                    self.close_block(line_number);
                    self.state = ParseState::Idle;
                }
                LineEvent::Noise => {}
                LineEvent::Text => {
                    if self.state != ParseState::Idle {
                        self.block.push(line);
                    }
                }
            }
        }

        // Flush a block left open at end of input
        let end = self.lines.len() + 1;
        self.close_block(end);
        self.entries
    }

    /// Emit the open block (if it has content). Start line is
    /// `line_number - accumulated_lines`.
    fn close_block(&mut self, line_number: usize) {
        let Some(kind) = self.state.kind() else {
            return;
        };

        let block = std::mem::take(&mut self.block);
        let content = block.join("\n").trim().to_string();
        if content.is_empty() {
            return;
        }

        let start = line_number.saturating_sub(block.len()).max(1);
        let timestamp = self.resolve_timestamp(start);

        self.entries
            .push(ContentEntry::new(kind, content, timestamp, start as i64));
    }

    fn resolve_timestamp(&self, start: usize) -> Option<String> {
        match &self.header {
            Some((ts, header_line)) if header_line.abs_diff(start) <= TIMESTAMP_WINDOW => {
                if *header_line >= start {
                    return Some(ts.clone());
                }
                preceding_timestamp(&self.lines, start, start - header_line - 1)
                    .or_else(|| Some(ts.clone()))
            }
            _ => nearest_timestamp(&self.lines, start),
        }
    }
}

/// Parse transcript text into ordered content entries. Never fails: text
/// without recognizable markers yields no entries.
pub fn parse_transcript(text: &str, session_id: &str) -> ParsedTranscript {
    ParsedTranscript {
        session_id: session_id.to_string(),
        entries: TranscriptParser::new(text).run(),
    }
}

/// Read and parse a `session-<id>.md` file
pub fn read_transcript(path: &Path) -> Result<ParsedTranscript, ParseFailure> {
    let session_id = session_id_from_path(path).ok_or_else(|| ParseFailure::InvalidName {
        path: path.to_path_buf(),
    })?;

    let bytes = std::fs::read(path).map_err(|source| ParseFailure::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| ParseFailure::Decode {
        path: path.to_path_buf(),
    })?;

    Ok(parse_transcript(&text, &session_id))
}

/// Derive the session id from a `session-<id>.md` path
pub fn session_id_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(SESSION_FILE_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let id = stem.strip_prefix(SESSION_FILE_PREFIX)?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Coarse creation date: the first three `-` components of the session id
/// (`2024-01-15-abc` -> `2024-01-15`)
pub fn created_date(session_id: &str) -> Option<String> {
    let parts: Vec<&str> = session_id.splitn(4, '-').collect();
    if parts.len() < 3 || parts[..3].iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts[..3].join("-"))
}

/// Nearest `HH:MM:SS` token within the window around `line_number`
/// (1-indexed). A preceding line wins a distance tie.
pub fn nearest_timestamp(lines: &[&str], line_number: usize) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let center = line_number.saturating_sub(1).min(lines.len() - 1);
    let token_at = |idx: usize| {
        TIME_TOKEN
            .captures(lines[idx])
            .map(|caps| caps[1].to_string())
    };

    if let Some(ts) = token_at(center) {
        return Some(ts);
    }
    for distance in 1..=TIMESTAMP_WINDOW {
        if let Some(ts) = center.checked_sub(distance).and_then(token_at) {
            return Some(ts);
        }
        let after = center + distance;
        if after < lines.len() {
            if let Some(ts) = token_at(after) {
                return Some(ts);
            }
        }
    }
    None
}

/// First `HH:MM:SS` token at or before `line_number`, looking back at most
/// `max_distance` lines
fn preceding_timestamp(lines: &[&str], line_number: usize, max_distance: usize) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let center = line_number.saturating_sub(1).min(lines.len() - 1);
    (0..=max_distance.min(center))
        .map(|distance| center - distance)
        .find_map(|idx| TIME_TOKEN.captures(lines[idx]).map(|caps| caps[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PROMPT_RESPONSE: &str = "### Prompt (10:15:00)
**Command/Request:**
```
Hello world
```
**Output/Response:**
```
Hi there!
```
---
";

    fn entry(kind: ContentKind, content: &str, ts: Option<&str>, line: i64) -> ContentEntry {
        ContentEntry::new(kind, content, ts.map(str::to_string), line)
    }

    #[test]
    fn test_prompt_and_response_pair() {
        let parsed = parse_transcript(PROMPT_RESPONSE, "2024-01-15-a");
        assert_eq!(parsed.session_id, "2024-01-15-a");
        assert_eq!(
            parsed.entries,
            vec![
                entry(ContentKind::Prompt, "Hello world", Some("10:15:00"), 5),
                entry(ContentKind::Response, "Hi there!", Some("10:15:00"), 9),
            ]
        );
    }

    #[test]
    fn test_file_change_line() {
        let line = "- [09:30:00] ✅ **Created:** `~/foo/bar.txt`";
        let parsed = parse_transcript(line, "s");
        assert_eq!(
            parsed.entries,
            vec![entry(ContentKind::FileChange, line, Some("09:30:00"), 1)]
        );
    }

    #[test]
    fn test_modified_file_change_inside_block_is_not_accumulated() {
        let text = "**Command/Request:**
first line
- [11:00:01] 📝 **Modified:** `src/main.rs`
second line
---";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].kind, ContentKind::FileChange);
        assert_eq!(parsed.entries[0].line_number, 3);
        assert_eq!(parsed.entries[1].kind, ContentKind::Prompt);
        assert_eq!(parsed.entries[1].content, "first line\nsecond line");
    }

    #[test]
    fn test_fences_and_labels_are_skipped() {
        let text = "**Command/Request:**
```bash
ls -la
```
**Notes:** ignored label
---";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, "ls -la");
    }

    #[test]
    fn test_empty_blocks_are_not_emitted() {
        let text = "**Command/Request:**
```
```
**Output/Response:**
---";
        assert!(parse_transcript(text, "s").entries.is_empty());
    }

    #[test]
    fn test_text_outside_blocks_is_ignored() {
        let text = "# Session notes
Some free text
---
More text";
        assert!(parse_transcript(text, "s").entries.is_empty());
    }

    #[test]
    fn test_separator_resets_to_idle() {
        let text = "**Output/Response:**
done
---
trailing prose";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, "done");
    }

    #[test]
    fn test_open_block_flushed_at_end_of_input() {
        let text = "**Command/Request:**
still typing";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].kind, ContentKind::Prompt);
        assert_eq!(parsed.entries[0].line_number, 2);
    }

    #[test]
    fn test_new_request_closes_open_response() {
        let text = "**Output/Response:**
old answer
**Command/Request:**
new question
---";
        let parsed = parse_transcript(text, "s");
        let kinds: Vec<_> = parsed.entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ContentKind::Response, ContentKind::Prompt]);
    }

    #[test]
    fn test_latest_prompt_header_wins() {
        let text = "### Prompt (08:00:00)
**Command/Request:**
one
---
### Prompt (09:00:00)
**Command/Request:**
two
---";
        let parsed = parse_transcript(text, "s");
        let ts: Vec<_> = parsed
            .entries
            .iter()
            .map(|e| e.timestamp.as_deref())
            .collect();
        assert_eq!(ts, vec![Some("08:00:00"), Some("09:00:00")]);
    }

    #[test]
    fn test_window_fallback_without_header() {
        let text = "Started at 07:45:12
**Command/Request:**
hello
---";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries[0].timestamp.as_deref(), Some("07:45:12"));
    }

    #[test]
    fn test_no_timestamp_outside_window() {
        let mut text = String::from("Logged 06:00:00\n");
        for _ in 0..15 {
            text.push_str("filler\n");
        }
        text.push_str("**Command/Request:**\nquestion\n---\n");
        let parsed = parse_transcript(&text, "s");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].timestamp, None);
    }

    #[test]
    fn test_window_edge_is_inclusive() {
        let mut lines = vec!["stamp 05:00:00"];
        lines.extend(std::iter::repeat("filler").take(15));
        assert_eq!(nearest_timestamp(&lines, 11).as_deref(), Some("05:00:00"));
        assert_eq!(nearest_timestamp(&lines, 12), None);
    }

    #[test]
    fn test_distant_header_does_not_apply() {
        let mut text = String::from("### Prompt (08:00:00)\n");
        for _ in 0..200 {
            text.push_str("filler\n");
        }
        text.push_str("**Command/Request:**\nmuch later question\n---\n");
        let parsed = parse_transcript(&text, "s");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].line_number, 203);
        assert_eq!(parsed.entries[0].timestamp, None);
    }

    #[test]
    fn test_nearby_token_beats_header_out_of_range() {
        let mut text = String::from("### Prompt (08:00:00)\n**Command/Request:**\none\n---\n");
        for _ in 0..12 {
            text.push_str("filler\n");
        }
        text.push_str("Resumed at 14:30:00\n**Command/Request:**\ntwo\n---\n");
        let parsed = parse_transcript(&text, "s");
        assert_eq!(
            parsed.entries,
            vec![
                entry(ContentKind::Prompt, "one", Some("08:00:00"), 3),
                entry(ContentKind::Prompt, "two", Some("14:30:00"), 19),
            ]
        );
    }

    #[test]
    fn test_closer_preceding_token_beats_header() {
        let text = "### Prompt (08:00:00)
Resumed at 08:05:00
**Command/Request:**
question
---";
        let parsed = parse_transcript(text, "s");
        assert_eq!(parsed.entries[0].timestamp.as_deref(), Some("08:05:00"));
    }

    #[test]
    fn test_nearest_timestamp_prefers_preceding_on_tie() {
        let lines = vec!["a 01:00:00", "middle", "b 02:00:00"];
        assert_eq!(nearest_timestamp(&lines, 2).as_deref(), Some("01:00:00"));
        assert_eq!(nearest_timestamp(&lines, 3).as_deref(), Some("02:00:00"));
        assert_eq!(nearest_timestamp(&[], 1), None);
    }

    #[test]
    fn test_session_id_from_path() {
        assert_eq!(
            session_id_from_path(&PathBuf::from("/x/session-2024-01-15-abc.md")).as_deref(),
            Some("2024-01-15-abc")
        );
        assert_eq!(session_id_from_path(&PathBuf::from("/x/notes.md")), None);
        assert_eq!(session_id_from_path(&PathBuf::from("/x/session-.md")), None);
        assert_eq!(
            session_id_from_path(&PathBuf::from("/x/session-abc.txt")),
            None
        );
    }

    #[test]
    fn test_created_date() {
        assert_eq!(
            created_date("2024-01-15-093000").as_deref(),
            Some("2024-01-15")
        );
        assert_eq!(created_date("2024-01-15").as_deref(), Some("2024-01-15"));
        assert_eq!(created_date("adhoc"), None);
    }

    #[test]
    fn test_read_transcript_rejects_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-bad.md");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let result = read_transcript(&path);
        assert!(matches!(result, Err(ParseFailure::Decode { .. })));
    }

    #[test]
    fn test_read_transcript_missing_file() {
        let result = read_transcript(Path::new("/nonexistent/session-x.md"));
        assert!(matches!(result, Err(ParseFailure::Read { .. })));
    }
}
