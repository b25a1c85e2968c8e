//! Human-readable output formatting

use super::colors::*;
use session_core::{SearchHit, TranscriptRecord};
use session_indexer::{BuildReport, IndexStats};

/// Format a search hit: header, optional time, preview, rule
pub fn format_hit(hit: &SearchHit) -> String {
    let mut out = format!(
        "=== Session: {} ({}) ===\n",
        colored_session(&hit.session_id),
        colored_kind(hit.kind)
    );
    if let Some(ts) = &hit.timestamp {
        out.push_str(&format!("{}: {}\n", label("Time"), colored_time(ts)));
    }
    out.push_str(&hit.preview());
    out.push('\n');
    out.push_str(&rule());
    out
}

/// Format the result of a build pass
pub fn format_report(report: &BuildReport) -> String {
    let mut out = format!(
        "Indexing complete. Processed {} of {} session files.",
        report.indexed, report.found
    );
    if report.failed > 0 {
        out.push('\n');
        out.push_str(&warning(&format!(
            "{} transcript(s) skipped because of errors (see log)",
            report.failed
        )));
    }
    out
}

/// One indexed transcript: session id, creation date, file path
pub fn format_transcript(record: &TranscriptRecord) -> String {
    format!(
        "{}  {}  {}",
        colored_session(&record.session_id),
        record.created_date.as_deref().unwrap_or("-"),
        record.file_path
    )
}

/// Format index statistics as labelled lines
pub fn format_stats(stats: &IndexStats) -> Vec<String> {
    let mut lines = Vec::new();
    let db = stats
        .db_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());

    lines.push(format!("  {}: {}", label("Database"), db));
    lines.push(format!(
        "  {}: {}",
        label("Size"),
        format_size(stats.db_size_bytes)
    ));
    lines.push(format!(
        "  {}: {}",
        label("Version"),
        value(&stats.version.to_string())
    ));
    lines.push(String::new());
    lines.push(format!(
        "  {}: {}",
        label("Sessions"),
        format_count(stats.transcript_count)
    ));
    lines.push(format!(
        "  {}: {}",
        label("Entries"),
        format_count(stats.entry_count)
    ));
    for (kind, count) in &stats.entries_by_kind {
        lines.push(format!("    {}: {}", colored_kind(*kind), format_count(*count)));
    }
    if let Some(last) = &stats.last_indexed {
        lines.push(String::new());
        lines.push(format!("  {}: {}", label("Last indexed"), value(last)));
    }
    lines
}
