//! Recursive directory scanner with suffix filtering
//!
//! Walks a source tree and yields every file whose name ends with the
//! configured suffix. The walk is lazy so the copy pass can start on the
//! first match; counting is simply a second, independent walk.

use crate::config::MatchMode;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Literal suffix comparison on file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    /// Bytes the file name must end with
    pattern: String,
}

impl SuffixFilter {
    /// Create a filter for `suffix` using the given match mode
    ///
    /// In [`MatchMode::Extension`] mode a leading dot on `suffix` is optional:
    /// both `"log"` and `".log"` require the name to end with `".log"`.
    pub fn new(suffix: &str, mode: MatchMode) -> Self {
        let pattern = match mode {
            MatchMode::Suffix => suffix.to_string(),
            MatchMode::Extension => format!(".{}", suffix.strip_prefix('.').unwrap_or(suffix)),
        };
        Self { pattern }
    }

    /// Check a bare file name (no directory components)
    pub fn matches_name(&self, name: &OsStr) -> bool {
        name.as_encoded_bytes().ends_with(self.pattern.as_bytes())
    }

    /// The string a matching name ends with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Directory scanner producing the files accepted by a [`SuffixFilter`]
#[derive(Debug, Clone)]
pub struct Scanner {
    filter: SuffixFilter,
    excluded: Option<PathBuf>,
}

impl Scanner {
    /// Create a scanner for the given filter
    pub fn new(filter: SuffixFilter) -> Self {
        Self {
            filter,
            excluded: None,
        }
    }

    /// Never descend into `dir`
    ///
    /// Used for the destination folder, which usually lives inside the
    /// source tree and would otherwise feed the run its own copies.
    pub fn excluding(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded = Some(dir.into());
        self
    }

    /// The filter this scanner applies
    pub fn filter(&self) -> &SuffixFilter {
        &self.filter
    }

    /// Count matching files under `root`
    pub fn count(&self, root: &Path) -> u64 {
        self.matching_files(root).count() as u64
    }

    /// Lazily yield matching file paths under `root`
    ///
    /// Unreadable entries are logged and skipped.
    pub fn matching_files<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        let exclusion = self.exclusion(root);

        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| !exclusion.skips(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(move |entry| self.is_match(entry))
            .map(DirEntry::into_path)
    }

    fn is_match(&self, entry: &DirEntry) -> bool {
        if entry.file_type().is_dir() {
            return false;
        }
        // Links to directories are neither followed nor collected
        if entry.path_is_symlink() && entry.path().is_dir() {
            return false;
        }
        self.filter.matches_name(entry.file_name())
    }

    fn exclusion(&self, root: &Path) -> Exclusion {
        let Some(excluded) = &self.excluded else {
            return Exclusion::default();
        };
        // Compared in canonical form so `./src/out` and `/abs/src/out` agree
        ExcludedDir {
            root: root.to_path_buf(),
            root_canonical: root.canonicalize().ok(),
            target: excluded.canonicalize().unwrap_or_else(|_| excluded.clone()),
        }
        .into()
    }
}

#[derive(Debug, Default)]
struct Exclusion(Option<ExcludedDir>);

#[derive(Debug)]
struct ExcludedDir {
    root: PathBuf,
    root_canonical: Option<PathBuf>,
    target: PathBuf,
}

impl From<ExcludedDir> for Exclusion {
    fn from(dir: ExcludedDir) -> Self {
        Self(Some(dir))
    }
}

impl Exclusion {
    fn skips(&self, entry: &DirEntry) -> bool {
        let Some(dir) = &self.0 else {
            return false;
        };
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        match (&dir.root_canonical, entry.path().strip_prefix(&dir.root)) {
            (Some(canonical), Ok(relative)) => canonical.join(relative) == dir.target,
            _ => entry.path() == dir.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(b"data").unwrap();
    }

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.log"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("report_txt"));
        touch(&dir.path().join("sub/b.log"));
        touch(&dir.path().join("sub/deeper/c.log"));
        touch(&dir.path().join("sub/deeper/c.log.bak"));
        dir
    }

    fn names(scanner: &Scanner, root: &Path) -> Vec<String> {
        let mut names: Vec<String> = scanner
            .matching_files(root)
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_suffix_filter_literal() {
        let filter = SuffixFilter::new("txt", MatchMode::Suffix);
        assert!(filter.matches_name(OsStr::new("report.txt")));
        assert!(filter.matches_name(OsStr::new("report_txt")));
        assert!(!filter.matches_name(OsStr::new("report.TXT")));
        assert!(!filter.matches_name(OsStr::new("report.txt.bak")));
    }

    #[test]
    fn test_suffix_filter_extension_mode() {
        let filter = SuffixFilter::new("txt", MatchMode::Extension);
        assert_eq!(filter.pattern(), ".txt");
        assert!(filter.matches_name(OsStr::new("report.txt")));
        assert!(!filter.matches_name(OsStr::new("report_txt")));

        let dotted = SuffixFilter::new(".txt", MatchMode::Extension);
        assert_eq!(dotted.pattern(), ".txt");
    }

    #[test]
    fn test_scanner_recursive() {
        let dir = create_test_dir();
        let scanner = Scanner::new(SuffixFilter::new(".log", MatchMode::Suffix));

        assert_eq!(scanner.count(dir.path()), 3);
        assert_eq!(names(&scanner, dir.path()), vec!["a.log", "b.log", "c.log"]);
    }

    #[test]
    fn test_scanner_suffix_without_dot() {
        let dir = create_test_dir();
        let scanner = Scanner::new(SuffixFilter::new("txt", MatchMode::Suffix));
        assert_eq!(names(&scanner, dir.path()), vec!["notes.txt", "report_txt"]);

        let scanner = Scanner::new(SuffixFilter::new("txt", MatchMode::Extension));
        assert_eq!(names(&scanner, dir.path()), vec!["notes.txt"]);
    }

    #[test]
    fn test_scanner_excludes_destination() {
        let dir = create_test_dir();
        let dest = dir.path().join("arquivos_.log");
        touch(&dest.join("a.log"));

        let scanner = Scanner::new(SuffixFilter::new(".log", MatchMode::Suffix));
        assert_eq!(scanner.count(dir.path()), 4);

        let scanner = scanner.excluding(&dest);
        assert_eq!(scanner.count(dir.path()), 3);
    }

    #[test]
    fn test_scanner_directories_never_match() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("folder.log")).unwrap();
        touch(&dir.path().join("folder.log/inner.log"));

        let scanner = Scanner::new(SuffixFilter::new(".log", MatchMode::Suffix));
        assert_eq!(names(&scanner, dir.path()), vec!["inner.log"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scanner_symlinks() {
        let dir = create_test_dir();
        let target = dir.path().join("sub");
        std::os::unix::fs::symlink(&target, dir.path().join("linkdir.log")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.log"), dir.path().join("link.log")).unwrap();

        let scanner = Scanner::new(SuffixFilter::new(".log", MatchMode::Suffix));
        // link.log counts, linkdir.log is a directory link and is not descended
        assert_eq!(names(&scanner, dir.path()), vec!["a.log", "b.log", "c.log", "link.log"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_count_equals_suffix_matches(
            files in prop::collection::hash_set("[a-c_]{1,4}(\\.[a-c]{1,2})?", 0..12),
            suffix in "[a-c.]{1,2}",
        ) {
            let dir = TempDir::new().unwrap();
            for (i, name) in files.iter().enumerate() {
                let path = if i % 2 == 0 {
                    dir.path().join(name)
                } else {
                    dir.path().join("sub").join(name)
                };
                touch(&path);
            }

            let expected = files.iter().filter(|n| n.ends_with(suffix.as_str())).count() as u64;
            let scanner = Scanner::new(SuffixFilter::new(&suffix, MatchMode::Suffix));

            prop_assert_eq!(scanner.count(dir.path()), expected);
            prop_assert_eq!(scanner.matching_files(dir.path()).count() as u64, expected);
        }
    }
}
