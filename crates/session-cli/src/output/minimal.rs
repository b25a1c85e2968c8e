//! Minimal text output formatting

use session_core::SearchHit;
use session_indexer::BuildReport;

/// Format a search hit as minimal text (content preview only)
pub fn format_hit(hit: &SearchHit) -> String {
    hit.preview()
}

/// Format a build report as the bare indexed count
pub fn format_report(report: &BuildReport) -> String {
    report.indexed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::{ContentKind, PREVIEW_CHARS};

    #[test]
    fn test_format_hit_truncates_long_content() {
        let hit = SearchHit {
            session_id: "s1".into(),
            kind: ContentKind::Response,
            content: "x".repeat(PREVIEW_CHARS + 50),
            timestamp: None,
            line_number: 3,
        };
        let text = format_hit(&hit);
        assert_eq!(text.chars().count(), PREVIEW_CHARS + 3);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_format_hit_keeps_short_content() {
        let hit = SearchHit {
            session_id: "s1".into(),
            kind: ContentKind::Prompt,
            content: "deploy".into(),
            timestamp: None,
            line_number: 1,
        };
        assert_eq!(format_hit(&hit), "deploy");
    }
}
