//! JSON output formatting

use session_core::SearchHit;
use session_indexer::{BuildReport, IndexStats};

/// Output a search hit as a single-line JSON object
pub fn format_hit(hit: &SearchHit) -> String {
    serde_json::json!({
        "session_id": hit.session_id,
        "type": hit.kind,
        "timestamp": hit.timestamp,
        "line_number": hit.line_number,
        "content": hit.content,
    })
    .to_string()
}

/// Output a build report as JSON
pub fn format_report(report: &BuildReport) -> String {
    serde_json::json!({
        "found": report.found,
        "indexed": report.indexed,
        "unchanged": report.unchanged,
        "failed": report.failed,
        "entries": report.entries,
    })
    .to_string()
}

/// Output index statistics as JSON
pub fn format_stats(stats: &IndexStats) -> serde_json::Value {
    let by_kind: serde_json::Map<String, serde_json::Value> = stats
        .entries_by_kind
        .iter()
        .map(|(kind, count)| (kind.to_string(), serde_json::json!(count)))
        .collect();

    serde_json::json!({
        "db_path": stats.db_path.as_ref().map(|p| p.to_string_lossy().to_string()),
        "db_size_bytes": stats.db_size_bytes,
        "version": stats.version,
        "session_count": stats.transcript_count,
        "entry_count": stats.entry_count,
        "entries_by_type": by_kind,
        "last_indexed": stats.last_indexed,
    })
}
