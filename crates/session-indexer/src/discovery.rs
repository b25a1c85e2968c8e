//! File discovery for session transcripts

use session_core::session_id_from_path;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default sessions directory (~/claude-prompts/admin)
pub fn default_sessions_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join("claude-prompts")
        .join("admin")
}

/// Find all `session-<id>.md` files directly inside `dir`, sorted by path
pub fn find_session_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && session_id_from_path(path).is_some())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_session_files_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(find_session_files(tmp.path()).is_empty());
    }

    #[test]
    fn test_find_session_files_filters_names() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("session-2024-01-02-b.md"), "").unwrap();
        fs::write(tmp.path().join("session-2024-01-01-a.md"), "").unwrap();
        fs::write(tmp.path().join("notes.md"), "").unwrap();
        fs::write(tmp.path().join("session-2024-01-03.txt"), "").unwrap();

        let files = find_session_files(tmp.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["session-2024-01-01-a.md", "session-2024-01-02-b.md"]);
    }

    #[test]
    fn test_find_session_files_is_not_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("archive");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("session-old.md"), "").unwrap();

        assert!(find_session_files(tmp.path()).is_empty());
    }

    #[test]
    fn test_find_session_files_nonexistent_dir() {
        assert!(find_session_files(Path::new("/nonexistent/path")).is_empty());
    }
}
