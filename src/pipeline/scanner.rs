use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Result;

/// Scanner for locating downloader artifacts by filename pattern
pub struct Scanner;

impl Scanner {
    /// Recursively collect files under `root` whose names match a
    /// glob-style pattern (`*` wildcards only). Directories themselves are
    /// skipped; an unreadable root or subdirectory is an error.
    pub fn scan<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut matches = Vec::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if matches_pattern(name, pattern) {
                matches.push(path.to_path_buf());
            }
        }

        matches.sort();
        Ok(matches)
    }
}

/// Match a filename against a pattern where `*` matches any run of
/// characters and everything else matches literally.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    fn inner(name: &[u8], pattern: &[u8]) -> bool {
        match (pattern.first(), name.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(name, &pattern[1..]) || (!name.is_empty() && inner(&name[1..], pattern))
            }
            (Some(p), Some(n)) if p == n => inner(&name[1..], &pattern[1..]),
            _ => false,
        }
    }

    inner(name.as_bytes(), pattern.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{Scanner, matches_pattern};
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("abc.description", "*.description"));
        assert!(matches_pattern("a.b.description", "*.description"));
        assert!(matches_pattern("exact.txt", "exact.txt"));
        assert!(!matches_pattern("abc.mp4", "*.description"));
        assert!(!matches_pattern("description", "*.description"));
    }

    #[test]
    fn test_scan_matches_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();

        let subdir = dir_path.join("Season_1");
        fs::create_dir(&subdir).unwrap();

        File::create(dir_path.join("one.description")).unwrap();
        File::create(subdir.join("two.description")).unwrap();
        File::create(subdir.join("two.mp4")).unwrap();

        let results = Scanner::scan(dir_path, "*.description").unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".description"))
        }));
    }

    #[test]
    fn test_scan_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();

        // A directory whose name matches the pattern must not be returned
        fs::create_dir(dir_path.join("fake.description")).unwrap();

        let results = Scanner::scan(dir_path, "*.description").unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(Scanner::scan(&missing, "*").is_err());
    }
}
