//! SHA-256 content hashing for identical-file detection
//!
//! Hash failures never abort a run: [`try_hash_file`] logs them and the
//! file is simply treated as not identical.

use crate::error::{IoResultExt, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hash result as hex string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    /// SHA-256 as lowercase hex
    pub hash: String,
    /// Bytes hashed
    pub size: u64,
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Compute the SHA-256 of a file
pub fn hash_file(path: &Path) -> Result<HashResult> {
    let file = File::open(path).with_path(path)?;
    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut size = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).with_path(path)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        size += bytes_read as u64;
    }

    Ok(HashResult {
        hash: hex::encode(hasher.finalize()),
        size,
    })
}

/// Compute the SHA-256 of data in memory
pub fn hash_bytes(data: &[u8]) -> HashResult {
    HashResult {
        hash: hex::encode(Sha256::digest(data)),
        size: data.len() as u64,
    }
}

/// Hash a file, logging and swallowing any read error
pub fn try_hash_file(path: &Path) -> Option<HashResult> {
    match hash_file(path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to hash file");
            None
        }
    }
}

/// Compares one source file against candidate files
///
/// The source hash is computed at most once, and only when a candidate has
/// the same size.
#[derive(Debug)]
pub struct ContentMatcher {
    source: PathBuf,
    source_size: Option<u64>,
    source_hash: Option<Option<HashResult>>,
}

impl ContentMatcher {
    /// Create a matcher for `source`
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let source_size = std::fs::metadata(&source)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len());
        Self {
            source,
            source_size,
            source_hash: None,
        }
    }

    /// Whether `other` holds exactly the source's content
    pub fn matches(&mut self, other: &Path) -> bool {
        let Some(source_size) = self.source_size else {
            return false;
        };
        match std::fs::metadata(other) {
            Ok(meta) if meta.is_file() && meta.len() == source_size => {}
            _ => return false,
        }

        let source = &self.source;
        let source_hash = self.source_hash.get_or_insert_with(|| try_hash_file(source));
        match (source_hash.as_ref(), try_hash_file(other)) {
            (Some(a), Some(b)) => a == &b,
            _ => false,
        }
    }
}
