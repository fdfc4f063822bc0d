//! Destination naming and file copy operations
//!
//! A matched file lands in the destination folder under its own name. When
//! that name is taken, `_1`, `_2`, ... is inserted before the extension and
//! the first free candidate wins.

use crate::config::RenameLimit;
use crate::error::{IoResultExt, Result, SuffixCopyError};
use std::io;
use std::path::{Path, PathBuf};

/// Where a source file should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Free path to copy to
    Available(PathBuf),
    /// Existing path that already holds the same content
    Identical(PathBuf),
}

impl Resolution {
    /// The resolved destination path
    pub fn path(&self) -> &Path {
        match self {
            Self::Available(path) | Self::Identical(path) => path,
        }
    }
}

/// Split a file name into stem and extension (extension keeps its dot)
///
/// The extension starts at the last dot, unless everything before that dot
/// is dots too: `.bashrc` and `..` have no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// `dir/stem_n.ext` for `dir/stem.ext`
pub fn numbered_path(desired: &Path, n: u64) -> PathBuf {
    let name = desired
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let (stem, ext) = split_name(&name);
    desired.with_file_name(format!("{stem}_{n}{ext}"))
}

/// `dir/stem` for `dir/stem.ext`, used when reporting a rename failure
pub fn base_path(desired: &Path) -> PathBuf {
    let name = desired
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let (stem, _) = split_name(&name);
    desired.with_file_name(stem)
}

/// Whether anything (including a dangling symlink) occupies `path`
pub fn path_taken(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Pick the destination for a file whose preferred path is `desired`
///
/// Candidates are tried in order `desired`, `desired_1`, `desired_2`, ...
/// `exists` decides whether a candidate is taken; `same_content` is asked
/// about each taken candidate and may claim it as an identical copy.
///
/// With [`RenameLimit::Bounded(n)`](RenameLimit::Bounded) the highest
/// suffix tried is `n - 1`; once that is taken too the resolution fails with
/// [`SuffixCopyError::RenameLimitExceeded`].
pub fn resolve_destination<E, S>(
    desired: &Path,
    limit: RenameLimit,
    mut exists: E,
    mut same_content: S,
) -> Result<Resolution>
where
    E: FnMut(&Path) -> bool,
    S: FnMut(&Path) -> bool,
{
    let mut candidate = desired.to_path_buf();
    let mut counter: u64 = 1;

    loop {
        if !exists(candidate.as_path()) {
            return Ok(Resolution::Available(candidate));
        }
        if same_content(candidate.as_path()) {
            return Ok(Resolution::Identical(candidate));
        }
        if let RenameLimit::Bounded(limit) = limit {
            if counter >= u64::from(limit) {
                return Err(SuffixCopyError::RenameLimitExceeded {
                    base: base_path(desired),
                    limit,
                });
            }
        }
        candidate = numbered_path(desired, counter);
        counter += 1;
    }
}

/// Copy file contents and permissions, following a symlinked source
///
/// Returns the number of bytes copied.
/// Sources that are not regular files (pipes, sockets, devices) are refused
/// instead of being opened, since reading them may block forever.
pub fn copy_file(source: &Path, dest: &Path) -> Result<u64> {
    let meta = std::fs::metadata(source).with_path(source)?;
    if !meta.is_file() {
        return Err(SuffixCopyError::io(
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }

    std::fs::copy(source, dest).map_err(|e| {
        // Blame whichever side is actually missing or unreadable
        let path = if source.exists() { dest } else { source };
        SuffixCopyError::io(path, e)
    })
}

/// Create the destination folder (and parents) if missing
pub fn create_destination(dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest).with_path(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn never(_: &Path) -> bool {
        false
    }

    fn taken(names: &[&str], dir: &Path) -> HashSet<PathBuf> {
        names.iter().map(|n| dir.join(n)).collect()
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("a.log"), ("a", ".log"));
        assert_eq!(split_name("a.tar.gz"), ("a.tar", ".gz"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".bashrc"), (".bashrc", ""));
        assert_eq!(split_name("..hidden.txt"), ("..hidden", ".txt"));
        assert_eq!(split_name("trailing."), ("trailing", "."));
    }

    #[test]
    fn test_numbered_path() {
        let dir = Path::new("/dst");
        assert_eq!(numbered_path(&dir.join("a.log"), 1), dir.join("a_1.log"));
        assert_eq!(numbered_path(&dir.join("a.tar.gz"), 12), dir.join("a.tar_12.gz"));
        assert_eq!(numbered_path(&dir.join("Makefile"), 2), dir.join("Makefile_2"));
    }

    #[test]
    fn test_resolve_free_name() {
        let dir = Path::new("/dst");
        let resolution =
            resolve_destination(&dir.join("a.log"), RenameLimit::default(), never, never).unwrap();
        assert_eq!(resolution, Resolution::Available(dir.join("a.log")));
    }

    #[test]
    fn test_resolve_first_gap() {
        let dir = Path::new("/dst");
        let existing = taken(&["a.log", "a_1.log", "a_3.log"], dir);
        let resolution = resolve_destination(
            &dir.join("a.log"),
            RenameLimit::default(),
            |p| existing.contains(p),
            never,
        )
        .unwrap();
        assert_eq!(resolution.path(), dir.join("a_2.log"));
    }

    #[test]
    fn test_resolve_identical_candidate() {
        let dir = Path::new("/dst");
        let existing = taken(&["a.log", "a_1.log"], dir);
        let same = dir.join("a_1.log");
        let resolution = resolve_destination(
            &dir.join("a.log"),
            RenameLimit::default(),
            |p| existing.contains(p),
            |p| p == same,
        )
        .unwrap();
        assert_eq!(resolution, Resolution::Identical(dir.join("a_1.log")));
    }

    #[test]
    fn test_resolve_bounded_limit() {
        let dir = Path::new("/dst");
        let mut existing: HashSet<PathBuf> = HashSet::new();
        existing.insert(dir.join("a.log"));
        for n in 1..999 {
            existing.insert(dir.join(format!("a_{n}.log")));
        }

        let err = resolve_destination(
            &dir.join("a.log"),
            RenameLimit::Bounded(999),
            |p| existing.contains(p),
            never,
        )
        .unwrap_err();
        match err {
            SuffixCopyError::RenameLimitExceeded { base, limit } => {
                assert_eq!(base, dir.join("a"));
                assert_eq!(limit, 999);
            }
            other => panic!("unexpected error: {other}"),
        }

        // One fewer collision still resolves to the last allowed suffix
        existing.remove(&dir.join("a_998.log"));
        let resolution = resolve_destination(
            &dir.join("a.log"),
            RenameLimit::Bounded(999),
            |p| existing.contains(p),
            never,
        )
        .unwrap();
        assert_eq!(resolution.path(), dir.join("a_998.log"));
    }

    #[test]
    fn test_resolve_unbounded() {
        let dir = Path::new("/dst");
        let mut existing: HashSet<PathBuf> = HashSet::new();
        existing.insert(dir.join("a.log"));
        for n in 1..1500 {
            existing.insert(dir.join(format!("a_{n}.log")));
        }

        let resolution = resolve_destination(
            &dir.join("a.log"),
            RenameLimit::Unbounded,
            |p| existing.contains(p),
            never,
        )
        .unwrap();
        assert_eq!(resolution.path(), dir.join("a_1500.log"));
    }

    #[test]
    fn test_copy_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.log");
        let dst = dir.path().join("dst.log");
        std::fs::write(&src, b"hello").unwrap();

        assert_eq!(copy_file(&src, &dst).unwrap(), 5);
        assert_eq!(std::fs::read(&dst).unwrap(), b"hello");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("missing.log");
        let err = copy_file(&src, &dir.path().join("dst.log")).unwrap_err();
        assert_eq!(err.path(), Some(&src));
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_refuses_fifo() {
        let dir = TempDir::new().unwrap();
        let fifo = dir.path().join("pipe.log");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(status.success());

        let dst = dir.path().join("dst.log");
        let err = copy_file(&fifo, &dst).unwrap_err();
        match &err {
            SuffixCopyError::Io { path, source } => {
                assert_eq!(path, &fifo);
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dst.exists());
    }

    #[test]
    fn test_path_taken_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.log");
        assert!(!path_taken(&file));

        std::fs::write(&file, b"x").unwrap();
        assert!(path_taken(&file));

        #[cfg(unix)]
        {
            let link = dir.path().join("dangling.log");
            std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();
            assert!(path_taken(&link));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_next_name_after_n_collisions(n in 0u64..40) {
            let dir = Path::new("/dst");
            let desired = dir.join("a.log");
            let mut existing: HashSet<PathBuf> = HashSet::new();
            if n > 0 {
                existing.insert(desired.clone());
            }
            for k in 1..n {
                existing.insert(numbered_path(&desired, k));
            }

            let resolution = resolve_destination(
                &desired,
                RenameLimit::default(),
                |p| existing.contains(p),
                never,
            ).unwrap();

            let expected = if n == 0 { desired.clone() } else { numbered_path(&desired, n) };
            prop_assert_eq!(resolution.path(), expected.as_path());
        }
    }
}
